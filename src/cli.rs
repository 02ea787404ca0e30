use core::convert::TryFrom;

use anyhow::{Error, Result};
use clap::{
    App,
    Arg,
    crate_version,
    SubCommand,
};

use crate::authenticator::{Command, Generate, Register, SecretRef, Share, Watch};
use crate::hotp::Algorithm;
use crate::totp::Config;

const ABOUT: &str = "
Generates RFC 6238 time-based one-time passwords from Base32 secrets,
with a small on-disk store for saved secrets and link sharing.
";

pub fn app() -> clap::App<'static, 'static> {

    let app = App::new("totp-generator")
        .version(crate_version!())
        .about(ABOUT)
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)

        .arg(Arg::with_name("STATE-FILE")
             .short("s")
             .long("state-file")
             .default_value("secrets.postcard")
             .help("file containing the saved secrets")
             .required(false)
             .global(true)
        )

        .subcommand(SubCommand::with_name("generate")
            .about("generate a code for a secret")
            .arg(Arg::with_name("SECRET")
                 .help("Base32 secret, e.g. JBSWY3DPEHPK3PXP (spaces and case don't matter)")
                 .value_name("SECRET")
                 .required_unless("id")
             )
            .arg(Arg::with_name("id")
                 .long("id")
                 .help("use a saved secret instead of typing one")
                 .value_name("ID")
                 .conflicts_with("SECRET")
             )
            .arg(Arg::with_name("timestamp")
                 .short("t")
                 .long("timestamp")
                 .help("timestamp to generate for, as seconds since the UNIX epoch")
                 .value_name("TIMESTAMP")
                 .required(false)
             )
            .arg(Arg::with_name("period")
                 .short("p")
                 .long("period")
                 .help("code validity period in seconds")
                 .value_name("SECONDS")
                 .default_value("30")
             )
            .arg(Arg::with_name("digits")
                 .short("d")
                 .long("digits")
                 .help("code width, 6 to 8 for common services")
                 .value_name("DIGITS")
                 .default_value("6")
             )
            .arg(Arg::with_name("algorithm")
                 .short("a")
                 .long("algorithm")
                 .help("HMAC hash: SHA1, SHA256 or SHA512")
                 .value_name("ALGORITHM")
                 .default_value("SHA1")
             )
        )

        .subcommand(SubCommand::with_name("watch")
            .about("follow a secret's codes with a live countdown")
            .arg(Arg::with_name("SECRET")
                 .help("Base32 secret to watch")
                 .value_name("SECRET")
                 .required_unless("id")
             )
            .arg(Arg::with_name("id")
                 .long("id")
                 .help("use a saved secret instead of typing one")
                 .value_name("ID")
                 .conflicts_with("SECRET")
             )
            .arg(Arg::with_name("period")
                 .short("p")
                 .long("period")
                 .value_name("SECONDS")
                 .default_value("30")
                 .help("code validity period in seconds")
             )
            .arg(Arg::with_name("digits")
                 .short("d")
                 .long("digits")
                 .value_name("DIGITS")
                 .default_value("6")
                 .help("code width")
             )
            .arg(Arg::with_name("algorithm")
                 .short("a")
                 .long("algorithm")
                 .value_name("ALGORITHM")
                 .default_value("SHA1")
                 .help("HMAC hash: SHA1, SHA256 or SHA512")
             )
        )

        .subcommand(SubCommand::with_name("register")
            .about("save a secret under a title")
            .arg(Arg::with_name("TITLE")
                 .help("title for the secret, e.g. 'work vpn'")
                 .value_name("TITLE")
                 .required(true)
             )
            .arg(Arg::with_name("SECRET")
                 .help("the Base32 secret to save")
                 .value_name("SECRET")
                 .required(true)
             )
            .arg(Arg::with_name("notes")
                 .long("notes")
                 .value_name("NOTES")
                 .help("free-form notes")
             )
            .arg(Arg::with_name("color")
                 .long("color")
                 .value_name("COLOR")
                 .help("display color tag")
             )
            .arg(Arg::with_name("favorite")
                 .long("favorite")
                 .help("mark as favorite right away")
             )
        )

        .subcommand(SubCommand::with_name("list")
            .about("list saved secrets, favorites first")
        )

        .subcommand(SubCommand::with_name("delete")
            .about("delete a saved secret")
            .arg(Arg::with_name("ID")
                 .help("id of the secret to delete, as shown by 'list'")
                 .value_name("ID")
                 .required(true)
             )
        )

        .subcommand(SubCommand::with_name("favorite")
            .about("toggle a saved secret's favorite flag")
            .arg(Arg::with_name("ID")
                 .help("id of the secret to toggle")
                 .value_name("ID")
                 .required(true)
             )
        )

        .subcommand(SubCommand::with_name("share")
            .about("print the URL-safe share component for a secret")
            .arg(Arg::with_name("SECRET")
                 .help("Base32 secret to share")
                 .value_name("SECRET")
                 .required_unless("id")
             )
            .arg(Arg::with_name("id")
                 .long("id")
                 .help("share a saved secret instead")
                 .value_name("ID")
                 .conflicts_with("SECRET")
             )
        )
    ;

    app

}

impl TryFrom<&'_ clap::ArgMatches<'static>> for Command {
    type Error = Error;
    fn try_from(args: &clap::ArgMatches<'static>) -> Result<Self> {
        if let Some(command) = args.subcommand_matches("generate") {
            return Ok(Command::Generate(Generate {
                secret: secret_ref(command),
                timestamp: timestamp(command)?,
                config: config(command)?,
            }));
        }

        if let Some(command) = args.subcommand_matches("watch") {
            return Ok(Command::Watch(Watch {
                secret: secret_ref(command),
                config: config(command)?,
            }));
        }

        if let Some(command) = args.subcommand_matches("register") {
            return Ok(Command::Register(Register {
                title: command.value_of("TITLE").unwrap().into(),
                secret: command.value_of("SECRET").unwrap().into(),
                notes: command.value_of("notes").map(Into::into),
                color: command.value_of("color").map(Into::into),
                favorite: command.is_present("favorite"),
            }));
        }

        if args.subcommand_matches("list").is_some() {
            return Ok(Command::List);
        }

        if let Some(command) = args.subcommand_matches("delete") {
            return Ok(Command::Delete {
                id: command.value_of("ID").unwrap().into(),
            });
        }

        if let Some(command) = args.subcommand_matches("favorite") {
            return Ok(Command::Favorite {
                id: command.value_of("ID").unwrap().into(),
            });
        }

        if let Some(command) = args.subcommand_matches("share") {
            return Ok(Command::Share(Share {
                secret: secret_ref(command),
            }));
        }

        Err(anyhow::anyhow!("Unexpected case"))
    }
}

// clap guarantees exactly one of the SECRET/--id pair is present
fn secret_ref(command: &clap::ArgMatches<'static>) -> SecretRef {
    match command.value_of("id") {
        Some(id) => SecretRef::Saved(id.into()),
        None => SecretRef::Literal(command.value_of("SECRET").unwrap().into()),
    }
}

fn timestamp(command: &clap::ArgMatches<'static>) -> Result<u64> {
    match command.value_of("timestamp") {
        Some(s) => Ok(s.parse()?),
        None => {
            let since_epoch = std::time::SystemTime::now().duration_since(std::time::SystemTime::UNIX_EPOCH).unwrap();
            Ok(since_epoch.as_secs())
        }
    }
}

fn config(command: &clap::ArgMatches<'static>) -> Result<Config> {
    let period: u32 = command.value_of("period").unwrap().parse()?;
    let digits: u32 = command.value_of("digits").unwrap().parse()?;
    let algorithm = match command.value_of("algorithm").unwrap().to_uppercase().as_str() {
        "SHA1" => Algorithm::Sha1,
        "SHA256" => Algorithm::Sha256,
        "SHA512" => Algorithm::Sha512,
        other => anyhow::bail!("unknown algorithm {}, expected SHA1, SHA256 or SHA512", other),
    };
    Ok(Config::new(period, digits, algorithm)?)
}
