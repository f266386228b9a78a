/**
 * userdesk console - Main Entry Point
 *
 * Headless front end over the client core. Each invocation restores the
 * persisted session, runs one command and exits.
 */
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use userdesk::client::{
    Config, DirectoryController, FetchOutcome, FileTokenStore, HttpDirectoryApi, RouteAccess,
    SessionError, SessionStore,
};
use userdesk::shared::{AppConfig, ApiError, EditUserForm, User, UserId};

const USAGE: &str = "\
usage: userdesk <command>

commands:
  login <email> <password>
  logout
  status
  list [page] [query...]
  edit <page> <id> <first-name> <last-name> <email>
  delete <page> <id>

environment:
  USERDESK_CONFIG    path to a TOML configuration file
  USERDESK_API_URL   directory service base URL
  USERDESK_DATA_DIR  where the session is persisted
  RUST_LOG           log filter (default: info)";

type Session = SessionStore<HttpDirectoryApi>;
type Directory = DirectoryController<HttpDirectoryApi>;
type CliResult = Result<(), Box<dyn std::error::Error>>;

enum Command {
    Login { email: String, password: String },
    Logout,
    Status,
    List { page: u32, query: String },
    Edit { page: u32, id: UserId, form: EditUserForm },
    Delete { page: u32, id: UserId },
}

fn parse_number<T: std::str::FromStr>(value: Option<&String>, what: &str) -> Result<T, String> {
    let raw = value.ok_or_else(|| format!("missing {}", what))?;
    raw.parse().map_err(|_| format!("invalid {}: {}", what, raw))
}

fn parse(args: &[String]) -> Result<Command, String> {
    let (command, rest) = args.split_first().ok_or("missing command")?;
    match command.as_str() {
        "login" => match rest {
            [email, password] => Ok(Command::Login {
                email: email.clone(),
                password: password.clone(),
            }),
            _ => Err("login takes <email> <password>".to_string()),
        },
        "logout" => Ok(Command::Logout),
        "status" => Ok(Command::Status),
        "list" => {
            let page = match rest.first() {
                Some(_) => parse_number(rest.first(), "page")?,
                None => 1,
            };
            let query = rest.iter().skip(1).cloned().collect::<Vec<_>>().join(" ");
            Ok(Command::List { page, query })
        }
        "edit" => match rest {
            [_, _, first, last, email] => Ok(Command::Edit {
                page: parse_number(rest.first(), "page")?,
                id: parse_number(rest.get(1), "id")?,
                form: EditUserForm {
                    first_name: first.clone(),
                    last_name: last.clone(),
                    email: email.clone(),
                },
            }),
            _ => Err("edit takes <page> <id> <first-name> <last-name> <email>".to_string()),
        },
        "delete" => match rest {
            [_, _] => Ok(Command::Delete {
                page: parse_number(rest.first(), "page")?,
                id: parse_number(rest.get(1), "id")?,
            }),
            _ => Err("delete takes <page> <id>".to_string()),
        },
        other => Err(format!("unknown command: {}", other)),
    }
}

fn print_user(user: &User) {
    println!("{:>4}  {:<28} {}", user.id, user.full_name(), user.email);
}

/// Route guard for everything behind login
fn require_login(session: &Session) -> Result<(), String> {
    match session.access() {
        RouteAccess::Granted => Ok(()),
        RouteAccess::Pending => Err("session is still loading".to_string()),
        RouteAccess::Denied => Err("not logged in; run `userdesk login <email> <password>`".to_string()),
    }
}

/// Drop a stale session when the service refuses our token
fn check_rejection(session: &Session, error: ApiError) -> Box<dyn std::error::Error> {
    match session.invalidate_on_rejection(&error) {
        Ok(true) => eprintln!("session expired; you have been logged out"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "could not clear rejected session"),
    }
    Box::new(error)
}

async fn load_page(session: &Session, directory: &Directory, page: u32) -> CliResult {
    match directory.fetch_page(page).await {
        Ok(FetchOutcome::Applied) => Ok(()),
        Ok(outcome) => Err(format!("page {} was not loaded ({:?})", page, outcome).into()),
        Err(e) => Err(check_rejection(session, e)),
    }
}

async fn run(command: Command, session: &Session, directory: &Directory) -> CliResult {
    match command {
        Command::Login { email, password } => {
            session.login(&email, &password).await.map_err(|e| match e {
                SessionError::Api(ApiError::Auth { .. }) => {
                    Box::<dyn std::error::Error>::from("Login failed: invalid email or password")
                }
                other => Box::new(other) as Box<dyn std::error::Error>,
            })?;
            println!("Logged in as {}", email);
        }
        Command::Logout => {
            session.logout()?;
            println!("Logged out");
        }
        Command::Status => {
            let snapshot = session.snapshot();
            println!("{:?} (authenticated: {})", snapshot.status, snapshot.authenticated);
        }
        Command::List { page, query } => {
            require_login(session)?;
            load_page(session, directory, page).await?;
            directory.set_query(query);

            let view = directory.view();
            if view.records.is_empty() {
                if view.query.trim().is_empty() {
                    println!("No users found.");
                } else {
                    println!("No users match your search.");
                }
            }
            for user in &view.records {
                print_user(user);
            }
            println!("Page {} of {}", view.current_page, view.total_pages);
        }
        Command::Edit { page, id, form } => {
            require_login(session)?;
            let patch = form.validate().map_err(|errors| {
                errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            })?;
            load_page(session, directory, page).await?;
            if directory.record(id).is_none() {
                return Err(format!("user {} is not on page {}", id, page).into());
            }

            match directory.edit_record(id, patch).await {
                Ok(Some(user)) => {
                    println!("User information updated successfully");
                    print_user(&user);
                }
                Ok(None) => println!("User information updated successfully"),
                Err(e) => return Err(check_rejection(session, e)),
            }
        }
        Command::Delete { page, id } => {
            require_login(session)?;
            load_page(session, directory, page).await?;
            let Some(user) = directory.record(id) else {
                return Err(format!("user {} is not on page {}", id, page).into());
            };

            directory
                .delete_record(id)
                .await
                .map_err(|e| check_rejection(session, e))?;
            println!("{} was deleted successfully", user.full_name());
        }
    }
    Ok(())
}

fn build() -> Result<(Session, Directory), Box<dyn std::error::Error>> {
    let file = match std::env::var("USERDESK_CONFIG") {
        Ok(path) => Some(AppConfig::load(path)?),
        Err(_) => None,
    };
    let config = Config::resolve(file)?;
    let session_path = config.session_path();
    tracing::debug!(server_url = config.server_url(), session = %session_path.display(), "configuration resolved");

    let tokens = Arc::new(FileTokenStore::new(session_path));
    let api = Arc::new(HttpDirectoryApi::new(config, tokens.clone())?);
    let session = SessionStore::open(api.clone(), tokens)?;
    Ok((session, DirectoryController::new(api)))
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let (session, directory) = match build() {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(command, &session, &directory).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
