//! vpnadmin CLI - manage VPN clients directly on the host.

use clap::{Parser, Subcommand};

use vpnadmin_pki::{ClientRegistry, PkiPaths};
use vpnadmin_server::users::hash_password;

/// vpnadmin - OpenVPN client management tool
#[derive(Parser)]
#[command(name = "vpnadmin")]
#[command(about = "Manage OpenVPN client certificates and bundles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List clients with their certificate status
    List,

    /// Issue a certificate and print the client bundle
    Create {
        /// Client name
        name: String,

        /// Passphrase-protect the generated private key
        #[arg(long)]
        encrypt_key: bool,
    },

    /// Revoke a client and republish the CRL
    Revoke {
        /// Client name
        name: String,
    },

    /// Print a client's configuration bundle
    Config {
        /// Client name
        name: String,
    },

    /// Hash a password for manual insertion into the user store
    #[command(name = "hash-password")]
    HashPassword {
        /// Plaintext password
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let registry = ClientRegistry::new(PkiPaths::from_env());

    match cli.command {
        Commands::List => {
            for identity in registry.identities().await? {
                println!("{}\t{}", identity.status, identity.name);
            }
        }
        Commands::Create { name, encrypt_key } => {
            let bundle = registry.create(&name, encrypt_key).await?;
            print!("{bundle}");
        }
        Commands::Revoke { name } => {
            registry.revoke(&name).await?;
            eprintln!("Client '{name}' revoked");
        }
        Commands::Config { name } => {
            let bundle = registry.fetch_config(&name).await?;
            print!("{bundle}");
        }
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password));
        }
    }

    Ok(())
}
