use clap::{Arg, Command};
use std::sync::Arc;

use datakura_client::config::ClientOptions;
use datakura_client::notify::{Notification, NotificationKind, Notifier};
use datakura_client::router::{GuardState, Route};
use datakura_client::storage::FileStore;
use datakura_client::Datakura;

const DEFAULT_STATE_FILE: &str = ".datakura-session.json";

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let marker = match notification.kind {
            NotificationKind::Positive => "ok",
            NotificationKind::Negative => "error",
        };
        match notification.caption {
            Some(caption) => eprintln!("[{}] {} ({})", marker, notification.message, caption),
            None => eprintln!("[{}] {}", marker, notification.message),
        }
    }
}

fn cli() -> Command<'static> {
    Command::new("datakura")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sign in to a Datakura warehouse server and inspect the session")
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .takes_value(true)
                .help("Server origin, defaults to DATAKURA_URL"),
        )
        .arg(
            Arg::new("state")
                .long("state")
                .value_name("FILE")
                .takes_value(true)
                .help("File keeping the persisted session"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("login")
                .about("Sign in with username and password")
                .arg(Arg::new("username").required(true))
                .arg(Arg::new("password").required(true)),
        )
        .subcommand(Command::new("whoami").about("Confirm the current session"))
        .subcommand(
            Command::new("switch-site")
                .about("Change the active site, or clear it when no code is given")
                .arg(Arg::new("site_code")),
        )
        .subcommand(
            Command::new("open")
                .about("Navigate to a list view through the session guard")
                .arg(
                    Arg::new("view")
                        .required(true)
                        .possible_values(["home", "warehouse", "products", "customers", "incoming-orders"]),
                ),
        )
        .subcommand(Command::new("logout").about("Sign out and clear the local session"))
        .subcommand(Command::new("status").about("Print the locally cached session"))
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let matches = cli().get_matches();

    let options = match matches.value_of("url") {
        Some(url) => Ok(ClientOptions::new(url)),
        None => ClientOptions::from_env(),
    };
    let options = match options {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(2);
        }
    };

    let state_file = matches.value_of("state").unwrap_or(DEFAULT_STATE_FILE);
    let storage = match FileStore::open(state_file) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("cannot open {}: {}", state_file, err);
            std::process::exit(2);
        }
    };

    let datakura = match Datakura::builder(options)
        .with_storage(Arc::new(storage))
        .with_notifier(Arc::new(ConsoleNotifier))
        .build()
    {
        Ok(datakura) => datakura,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(2);
        }
    };

    let success = match matches.subcommand() {
        Some(("login", args)) => {
            let username = args.value_of("username").unwrap_or_default();
            let password = args.value_of("password").unwrap_or_default();
            let signed_in = datakura.auth().sign_in(username, password).await;
            if signed_in {
                ConsoleNotifier.notify(Notification::positive(format!("signed in as {}", username)));
            } else {
                eprintln!("login failed");
            }
            signed_in
        }
        Some(("whoami", _)) => match datakura.auth().who_am_i().await {
            Some(user) => {
                println!("{}", serde_json::to_string_pretty(&user).unwrap_or_default());
                true
            }
            None => false,
        },
        Some(("switch-site", args)) => {
            let site = args.value_of("site_code");
            datakura.auth().switch_site(site).await.is_some()
        }
        Some(("open", args)) => {
            let route = match args.value_of("view") {
                Some("warehouse") => Route::Warehouse,
                Some("products") => Route::Products,
                Some("customers") => Route::Customers,
                Some("incoming-orders") => Route::IncomingOrders,
                _ => Route::Home,
            };
            match datakura.router().push(route).await {
                GuardState::Allowed => {
                    if let Some(location) = datakura.router().current() {
                        println!("{}", location.href());
                    }
                    true
                }
                state => {
                    eprintln!("navigation not allowed: {:?}", state);
                    false
                }
            }
        }
        Some(("logout", _)) => {
            datakura.auth().sign_out().await;
            true
        }
        Some(("status", _)) => {
            let snapshot = datakura.session().snapshot();
            match snapshot.user {
                Some(user) => println!(
                    "{} (site: {}, expires: {})",
                    user.username,
                    user.active_site.as_deref().unwrap_or("-"),
                    snapshot
                        .expiry_date
                        .map(|date| date.to_rfc3339())
                        .unwrap_or_else(|| "-".to_string())
                ),
                None => println!("not signed in"),
            }
            true
        }
        _ => false,
    };

    if !success {
        std::process::exit(1);
    }
}
