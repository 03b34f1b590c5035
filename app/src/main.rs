//! dexd entry point. Usage: `dexd [config.json]`

use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dexd_lib::init_tracing();

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = dexd_lib::load_config(path.as_deref())?;
    dexd_lib::run(config).await
}
