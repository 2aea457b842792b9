use super::super::args::ServeArgs;
use crate::exit_codes::SUCCESS;
use formgate_server::ServerConfig;

pub async fn run(args: ServeArgs) -> anyhow::Result<i32> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_env();
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    formgate_server::serve(config).await?;
    Ok(SUCCESS)
}
