use clap::Parser;
use jsonpeek::cli::{
    extract::handle_extract, get::handle_get, handle_completions, handle_config_init,
    run::run_poller, Cli, Commands, ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run_poller(args).await,
        Commands::Get(args) => handle_get(args).await,
        Commands::Extract(args) => handle_extract(&args),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
