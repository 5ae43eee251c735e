use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use petlineage::{CancellationToken, Config, GraphBuilder, GraphSink, HttpPetFetcher, PetGraph};

#[derive(Parser, Debug)]
#[command(name = "petlineage")]
#[command(about = "Build and print the genealogy graph for a pet")]
struct Args {
    /// Id of the pet to root the graph at
    id: i64,

    /// Print the finished graph as JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Sink that prints results to stdout as they arrive.
struct StdoutSink {
    json: bool,
}

#[async_trait]
impl GraphSink for StdoutSink {
    async fn label(&self, label: String) {
        println!("Genealogy of: {label}");
    }

    async fn graph(&self, graph: PetGraph) {
        if self.json {
            match serde_json::to_string_pretty(&graph) {
                Ok(body) => println!("{body}"),
                Err(e) => log::error!("Failed to serialize graph: {e}"),
            }
            return;
        }

        println!("{} pets, {} relations", graph.node_count(), graph.edge_count());
        for node in &graph.nodes {
            let marker = if node.record.is_placeholder() { " [unavailable]" } else { "" };
            println!("  #{} {}{}", node.record.id, node.record.name, marker);
        }
        for edge in &graph.edges {
            let marker = if edge.degraded { " [degraded]" } else { "" };
            println!("  {} -> {}{}", edge.from, edge.to, marker);
        }
    }

    async fn ready(&self, ready: bool) {
        log::debug!("Graph ready: {ready}");
    }

    async fn failed(&self, message: String) {
        eprintln!("Graph load failed: {message}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    let fetcher = HttpPetFetcher::new(
        config.api.base_url.clone(),
        config.request_timeout(),
        config.api.max_retries,
    );

    let builder = GraphBuilder::new(fetcher)
        .with_fetch_concurrency(config.graph.fetch_concurrency)
        .with_overall_timeout(config.overall_timeout());

    let sink = StdoutSink { json: args.json };
    builder
        .load_graph(args.id, &sink, &CancellationToken::new())
        .await;

    Ok(())
}
