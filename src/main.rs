use docker_retag::cli::{Args, Runner};
use docker_retag::config::RetagConfig;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse_args();

    if let Err(message) = args.validate() {
        eprintln!("{}", message);
        Args::print_usage();
        return ExitCode::FAILURE;
    }

    let runner = Runner::new(args, RetagConfig::from_env());
    match runner.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            runner.output().error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
