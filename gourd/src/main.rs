use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use gourd_config::{GourdConfiguration, LoadTomlConfiguration, LoggingConfig};
use gourd_item::{load::load_records, Item, ItemFactory, ItemRecord};
use itertools::Itertools;

use crate::context::ItemContext;

mod context;

#[derive(Parser, Debug)]
#[clap(about, version)]
struct Args {
    /// Configuration file, created with defaults when missing.
    #[clap(long, default_value = "configuration.toml")]
    config: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists the creative inventory.
    Creative,
    /// Decodes a JSON array of item records.
    Decode { file: PathBuf },
    /// Prints the item record for an item.
    Encode {
        id: i32,
        #[clap(long, default_value_t = 0)]
        meta: i16,
        #[clap(long, default_value_t = 1)]
        count: i32,
        /// Custom name
        #[clap(long)]
        name: Option<String>,
        /// Lore lines, may be repeated
        #[clap(long)]
        lore: Vec<String>,
    },
}

fn init_logger(config: &LoggingConfig) {
    if config.enabled {
        let mut logger = simple_logger::SimpleLogger::new();
        logger = logger.with_timestamp_format(time::macros::format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ));

        if !config.timestamp {
            logger = logger.without_timestamps();
        }

        if config.env {
            logger = logger.env();
        }

        logger = logger.with_level(config.level.into());

        logger = logger.with_colors(config.color);
        logger = logger.with_threads(config.threads);
        if let Err(err) = logger.init() {
            eprintln!("Couldn't set up logging: {err}");
        }
    }
}

fn describe(item: &Item) -> String {
    if item.get_lore().is_empty() {
        item.to_string()
    } else {
        format!("{item} lore: {}", item.get_lore().iter().join(" | "))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match GourdConfiguration::load_from(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    init_logger(&config.logging);

    let context = match ItemContext::new(&config.items) {
        Ok(context) => context,
        Err(err) => {
            err.log();
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Command::Creative => {
            for (index, item) in context.creative_items().iter().enumerate() {
                println!("{index:>4} {}", describe(item));
            }
        }
        Command::Decode { file } => {
            let records = fs::read_to_string(&file)
                .map_err(|err| err.to_string())
                .and_then(|json| {
                    serde_json::from_str::<Vec<ItemRecord>>(&json).map_err(|err| err.to_string())
                });
            let records = match records {
                Ok(records) => records,
                Err(err) => {
                    log::error!("Couldn't read item records from {}: {err}", file.display());
                    return ExitCode::FAILURE;
                }
            };
            for item in load_records(&records, &context.registry) {
                println!("{}", describe(&item));
            }
        }
        Command::Encode {
            id,
            meta,
            count,
            name,
            lore,
        } => {
            let id = match i16::try_from(id) {
                Ok(id) => id,
                Err(_) => {
                    gourd_item::ItemError::Construction { id }.log();
                    return ExitCode::FAILURE;
                }
            };
            let mut item = context.registry.get(id, meta, count, None);
            if let Some(name) = name {
                item.set_custom_name(name);
            }
            item.set_lore(lore);

            let record = match item.json_serialize_with(context.encoding) {
                Ok(record) => record,
                Err(err) => {
                    err.log();
                    return ExitCode::FAILURE;
                }
            };
            match serde_json::to_string(&record) {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    log::error!("Couldn't write item record: {err}");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}
