use super::super::args::CheckArgs;
use crate::exit_codes;
use anyhow::Context;
use formgate_core::{
    ContactSchema, FieldValues, HoneypotPolicy, SubmissionStatus, SubmissionValidator,
};

pub fn run(args: CheckArgs) -> anyhow::Result<i32> {
    if !args.no_honeypot && args.honeypot_field.trim().is_empty() {
        anyhow::bail!("honeypot field name must not be empty");
    }
    let schema = match &args.schema {
        Some(path) => ContactSchema::from_file(path)?,
        None => ContactSchema::default_contact()?,
    };
    let honeypot = HoneypotPolicy {
        enabled: !args.no_honeypot,
        field: args.honeypot_field.clone(),
        ..HoneypotPolicy::default()
    };
    let fields = parse_fields(&args.fields)?;

    let verdict = SubmissionValidator::new(schema, honeypot).process_submission(&fields);
    println!(
        "{}",
        serde_json::to_string_pretty(&verdict).context("failed to encode verdict")?
    );

    Ok(match verdict.status {
        SubmissionStatus::Accepted => exit_codes::SUCCESS,
        SubmissionStatus::FlaggedAsBot => exit_codes::FLAGGED_AS_BOT,
        SubmissionStatus::Rejected | SubmissionStatus::Unvalidated => exit_codes::REJECTED,
    })
}

/// `FIELD=VALUE` pairs; the value may be empty or contain further `=`.
fn parse_fields(pairs: &[String]) -> anyhow::Result<FieldValues> {
    pairs
        .iter()
        .map(|pair| {
            let (name, value) = pair
                .split_once('=')
                .with_context(|| format!("expected FIELD=VALUE, got {pair:?}"))?;
            if name.is_empty() {
                anyhow::bail!("empty field name in {pair:?}");
            }
            Ok((name.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_with_empty_and_nested_values() {
        let fields = parse_fields(&[
            "message=a=b".to_string(),
            "password=".to_string(),
        ])
        .unwrap();
        assert_eq!(fields["message"], "a=b");
        assert_eq!(fields["password"], "");
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_fields(&["message".to_string()]).is_err());
        assert!(parse_fields(&["=value".to_string()]).is_err());
    }
}
