use core::convert::TryFrom;

use anyhow::Result;
use log::info;

use totp_generator::{
    authenticator::{self, Authenticator, Command},
    cli,
    session::{SecretState, Session},
    store::SecretStore,
};

fn main() -> Result<()> {

    init_logger();

    let args = init_app();

    let state_file: &str = args.value_of("STATE-FILE").unwrap();
    let store = SecretStore::open(state_file)?;
    let mut authenticator = Authenticator::new(store);

    let command = Command::try_from(&args)?;

    match command {
        Command::Register(register) => {
            let id = authenticator.register(&register, unix_now())?;
            println!("saved as {}", id);
        }
        Command::Generate(generate) => {
            let code = authenticator.generate(&generate)?;
            println!("{}", code);
        }
        Command::Watch(watch) => {
            run_watch(&authenticator, &watch)?;
        }
        Command::List => {
            if authenticator.list().is_empty() {
                println!("no saved secrets");
            }
            for record in authenticator.list() {
                let favorite = if record.is_favorite { "*" } else { " " };
                match &record.notes {
                    Some(notes) => println!("{} {}  {}  ({})", favorite, record.id, record.title, notes),
                    None => println!("{} {}  {}", favorite, record.id, record.title),
                }
            }
        }
        Command::Delete { id } => {
            let record = authenticator.delete(&id)?;
            println!("deleted {} ({})", record.id, record.title);
        }
        Command::Favorite { id } => {
            let favorite = authenticator.favorite(&id, unix_now())?;
            println!("{} is {} a favorite", id, if favorite { "now" } else { "no longer" });
        }
        Command::Share(share) => {
            println!("?s={}", authenticator.share(&share)?);
        }
    }

    Ok(())
}

/// The ≈1 Hz driving loop: tick the session once per second, repaint the
/// code and countdown, regenerate at period boundaries (the session
/// handles that part).
fn run_watch(authenticator: &Authenticator, watch: &authenticator::Watch) -> Result<()> {
    use std::io::Write as _;

    let secret = authenticator.resolve(&watch.secret)?;
    let mut session = Session::new(watch.config);
    session.set_secret(&secret);

    if session.state() != SecretState::Valid {
        anyhow::bail!("secret is not valid Base32 (characters A-Z and 2-7)");
    }

    info!("watching; press Ctrl-C to stop");
    loop {
        let display = session.tick(unix_now())?;
        // code is always present in the Valid state
        let code = display.code.as_deref().unwrap_or("-");
        print!("\r{}  ({:2}s left) ", code, display.remaining_seconds);
        std::io::stdout().flush()?;
        std::thread::sleep(std::time::Duration::from_secs(1));
    }
}

fn unix_now() -> u64 {
    let since_epoch = std::time::SystemTime::now().duration_since(std::time::SystemTime::UNIX_EPOCH).unwrap();
    since_epoch.as_secs()
}

pub fn init_app() -> clap::ArgMatches<'static> {
    let app = cli::app();
    let matches = app.get_matches();
    matches
}

pub fn init_logger() {
    simple_logger::SimpleLogger::new().init().unwrap();
}
