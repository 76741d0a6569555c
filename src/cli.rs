use crate::config;
use crate::logging;
use crate::tool::base::ToolContext;
use crate::tool::ToolRegistry;
use anyhow::{bail, Context, Result};
use serde_json::json;

const USAGE: &str = "Usage: websearch search <query> [num_results]\n       websearch fetch <url>";

/// Run one tool invocation from the command line and print its output.
pub async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let params = match args.as_slice() {
        [action, query] if action == "search" => {
            json!({"action": "search", "query": query})
        }
        [action, query, num] if action == "search" => {
            let num: usize = num
                .parse()
                .map_err(|_| anyhow::anyhow!("num_results must be an integer\n{USAGE}"))?;
            json!({"action": "search", "query": query, "num_results": num})
        }
        [action, url] if action == "fetch" => {
            json!({"action": "fetch", "url": url})
        }
        _ => bail!("{USAGE}"),
    };

    let config = config::load_or_create_config()?;
    let _log_guard = logging::init(&config)?;

    let registry = ToolRegistry::new(config);
    let tool = registry
        .get("web_search")
        .context("web_search tool not registered")?;

    let ctx = ToolContext::new(
        "cli",
        "cli",
        "cli",
        std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")),
    );

    let result = tool.execute(params, &ctx).await?;
    println!("{}", result.output);

    Ok(())
}
