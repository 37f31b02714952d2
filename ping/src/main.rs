use clap::Parser;
use tokio_icmp_probe::config::{HEADERS_SIZE, MAX_HOSTNAME_LEN};
use tokio_icmp_probe::net::resolve_target;
use tokio_icmp_probe::ping::Identifier;
use tokio_icmp_probe::{RawSocket, Session, SessionConfig};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Send ICMP echo requests to a host once a second until interrupted
#[derive(Parser, Debug)]
#[command(name = "ping", disable_help_flag = true)]
struct Args {
    /// Hostname or dotted-decimal IPv4 address of the target
    #[arg(value_parser = parse_target)]
    target: String,
}

fn parse_target(target: &str) -> Result<String, String> {
    if target.len() > MAX_HOSTNAME_LEN {
        return Err(format!("target is longer than {MAX_HOSTNAME_LEN} bytes"));
    }
    Ok(target.to_string())
}

fn configure_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::NONE)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for interrupt");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            err.print()?;
            return Ok(());
        }
    };
    configure_logging();

    let config = SessionConfig::default();
    let addr = resolve_target(&args.target)?;
    let socket = RawSocket::open(config.poll_timeout)?;
    let (session, mut replies) = Session::new(config, addr, Identifier::from_process(), socket)?;

    println!(
        "PING {} ({}) {}({}) bytes of data.",
        args.target,
        addr,
        config.payload_size,
        config.payload_size + HEADERS_SIZE
    );
    let printer = tokio::spawn(async move {
        while let Some(reply) = replies.recv().await {
            println!("{reply}");
        }
    });
    let statistics = session.run(interrupted()).await;
    printer.await?;
    println!("{statistics}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use test_case::test_case;

    #[test]
    fn test_target_argument() {
        let args = Args::try_parse_from(["ping", "192.168.1.1"]).unwrap();
        assert_eq!("192.168.1.1", args.target);
    }

    #[test_case(&["ping"], ErrorKind::MissingRequiredArgument; "missing target")]
    #[test_case(&["ping", "--help"], ErrorKind::UnknownArgument; "help flag")]
    #[test_case(&["ping", "--version"], ErrorKind::UnknownArgument; "version flag")]
    #[test_case(&["ping", "a.b", "c.d"], ErrorKind::UnknownArgument; "second target")]
    fn test_rejected_arguments(argv: &[&str], kind: ErrorKind) {
        assert_eq!(kind, Args::try_parse_from(argv).unwrap_err().kind());
    }

    #[test]
    fn test_target_too_long() {
        let target = "a".repeat(MAX_HOSTNAME_LEN + 1);
        let err = Args::try_parse_from(["ping", target.as_str()]).unwrap_err();
        assert_eq!(ErrorKind::ValueValidation, err.kind());
    }
}
