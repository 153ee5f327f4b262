use std::io;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cardfile_server::router::Router;
use cardfile_server::server::Server;
use cardfile_server::store::Schema;

#[derive(Parser)]
struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, default_value = "8080")]
    port: u16,
    /// Which collection preset this instance serves.
    #[arg(long, value_enum, default_value = "contacts")]
    collection: Collection,
    /// Per-connection read timeout. Off by default: a stalled client then
    /// blocks the accept loop until it goes away.
    #[arg(long)]
    read_timeout_secs: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Collection {
    Contacts,
    Notes,
}

impl Collection {
    fn schema(self) -> Schema {
        return match self {
            Collection::Contacts => Schema::contacts(),
            Collection::Notes => Schema::notes(),
        };
    }
}

fn main() -> io::Result<()> {
    let args = Cli::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let server = Server::bind(
        (args.host.as_str(), args.port),
        Router::new(args.collection.schema()),
        args.read_timeout_secs.map(Duration::from_secs),
    )?;
    info!(address = %server.local_addr()?, "listening");
    return server.run();
}
