mod cli;
mod command;
mod config;
mod gateways;
mod session;
mod view;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    cli::run()
}
