use fare_engine::FareEngine;
use fare_engine::config::EngineConfig;
use fare_engine::topology::JsonTopologyFile;
use tracing_subscriber::EnvFilter;

/// Default number of results for a station search.
const SEARCH_LIMIT: usize = 20;

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  fare-engine <network.json> <from-code> <to-code>");
    eprintln!("  fare-engine <network.json> --stations [keyword]");
    eprintln!("  fare-engine <network.json> --lines");
    std::process::exit(2);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (path, rest) = match args.split_first() {
        Some((path, rest)) if !rest.is_empty() => (path, rest),
        _ => usage(),
    };

    let config = EngineConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let engine = FareEngine::new(JsonTopologyFile::new(path), config);
    if let Err(e) = engine.rebuild() {
        eprintln!("Error: failed to load {path}: {e}");
        std::process::exit(1);
    }

    let (output, priced) = match rest {
        [flag] if flag == "--lines" => (serde_json::to_string_pretty(&engine.lines()), true),
        [flag] if flag == "--stations" => (
            serde_json::to_string_pretty(&engine.search_stations("", SEARCH_LIMIT)),
            true,
        ),
        [flag, keyword] if flag == "--stations" => (
            serde_json::to_string_pretty(&engine.search_stations(keyword, SEARCH_LIMIT)),
            true,
        ),
        [from, to] => {
            let quote = engine.quote(from, to);
            (serde_json::to_string_pretty(&quote), quote.mode.is_success())
        }
        _ => usage(),
    };

    match output {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    // The quote is still printed so callers can read the mode.
    if !priced {
        std::process::exit(3);
    }
}
