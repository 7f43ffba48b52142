use clap::{Parser, Subcommand};
use rolebak::config::{self, ChecksumPolicy, DecodeOptions};
use rolebak::sink::stamp;
use rolebak::text::{display_name, name_hex};
use rolebak::{DecodeFailure, DecodeOutcome, LogSink, RawEnvelope, RoleDecoder};
use std::fmt;
use std::path::PathBuf;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "rolebak", about = "Role save data (.bak) decoder")]
struct Cli {
    /// Print timestamped decoder progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Input {
    input: PathBuf,
    /// Input is a bare payload (database row dump), not a .bak envelope
    #[arg(long)]
    raw: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show envelope, offsets and checksums
    Info {
        #[command(flatten)]
        src: Input,
    },
    /// Decode every section and print a summary
    Decode {
        #[command(flatten)]
        src: Input,
        /// Report a checksum mismatch as a failure
        #[arg(short, long)]
        strict: bool,
        /// JSON decoder options file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the full decoded role as JSON
        #[arg(long)]
        json: bool,
    },
    /// List fight and life skills
    Skills {
        #[command(flatten)]
        src: Input,
    },
    /// List task variables
    Tasks {
        #[command(flatten)]
        src: Input,
    },
    /// List items
    Items {
        #[command(flatten)]
        src: Input,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let stderr_sink = |args: fmt::Arguments<'_>| eprintln!("{args}");
    let sink: Option<&dyn LogSink> = if cli.verbose { Some(&stderr_sink) } else { None };

    match cli.command {

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { src } => {
            let data = read_input(&src)?;
            if !src.raw {
                let env = RawEnvelope::read(&data)?;
                println!("── Role bak ─────────────────────────────────────────────");
                println!("  Path           {}", src.input.display());
                println!("  Name           {}", display_name(env.name_bytes));
                println!("  Name (hex)     {}", name_hex(env.name_bytes));
                println!("  Name length    {} B", env.name_len);
                println!("  Payload length {} B", env.payload_len);
            }
            let outcome = decode(&src, &data, DecodeOptions::default(), sink)?;
            let b = &outcome.role.base;
            println!("  Version        {}", b.version);
            println!("  Data length    {} B", b.data_len);
            println!("  Offsets        fskill={} lskill={} task={} item={} state={} ext={}",
                b.fight_skill_offset, b.life_skill_offset, b.task_offset,
                b.item_offset, b.state_offset, b.ext_buff_offset());
            println!("  Counts         item={} state={}", b.item_count, b.state_count);
            match outcome.role.checksum {
                Some(c) => println!("  CRC32          computed {:08X}  stored {:08X}  {}",
                    c.computed, c.stored, if c.matches() { "ok" } else { "MISMATCH" }),
                None    => println!("  CRC32          (payload too short)"),
            }
            print_status(&outcome);
        }

        // ── Decode ───────────────────────────────────────────────────────────
        Commands::Decode { src, strict, config: config_path, json } => {
            let mut opts = match config_path {
                Some(p) => config::load_from_file(p)?,
                None    => DecodeOptions::default(),
            };
            if strict { opts.checksum = ChecksumPolicy::Enforce; }
            let data = read_input(&src)?;
            let outcome = decode(&src, &data, opts, sink)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.role)?);
            } else {
                let role = &outcome.role;
                let info = &role.base.base_info;
                println!("Role:        {} (account {})", info.role_name(), info.account());
                println!("Level:       {}  exp {}", info.role_level, info.experience());
                println!("Money:       bag {}  box {}", info.bag_money, info.box_money);
                println!("Fight skills {:>6}", role.fight_skills.len());
                println!("Life skills  {:>6}", role.life_skills.len());
                println!("Tasks        {:>6}", role.tasks.len());
                println!("Items        {:>6}", role.items.len());
                println!("States       {:>6}", role.states.len());
                let ext = &role.extensions;
                println!("Extensions   base={} lock={} hanger_on={} trans={} break={} compose={}",
                    ext.base.len(), ext.ling_long_lock.len(), ext.hanger_on.len(),
                    ext.trans_nimbus.len(), ext.breaks.len(), ext.equip_compose.len());
            }
            print_status(&outcome);
        }

        // ── Skills ───────────────────────────────────────────────────────────
        Commands::Skills { src } => {
            let data = read_input(&src)?;
            let outcome = decode(&src, &data, DecodeOptions::default(), sink)?;
            for (title, skills) in [("FIGHT SKILL DATA", &outcome.role.fight_skills),
                                    ("LIFE SKILL DATA",  &outcome.role.life_skills)] {
                println!("── {title} ── total {}", skills.len());
                println!("{:>8} {:>6} {:>12}", "Id", "Level", "Exp");
                for s in skills {
                    println!("{:>8} {:>6} {:>12}", s.skill_id, s.skill_level, s.skill_exp);
                }
            }
            print_status(&outcome);
        }

        // ── Tasks ────────────────────────────────────────────────────────────
        Commands::Tasks { src } => {
            let data = read_input(&src)?;
            let outcome = decode(&src, &data, DecodeOptions::default(), sink)?;
            println!("── TASK VALUE ── total {}", outcome.role.tasks.len());
            for t in &outcome.role.tasks {
                println!("Task[ {:<5} ] = {}", t.task_id, t.task_value);
            }
            print_status(&outcome);
        }

        // ── Items ────────────────────────────────────────────────────────────
        Commands::Items { src } => {
            let data = read_input(&src)?;
            let outcome = decode(&src, &data, DecodeOptions::default(), sink)?;
            println!("── ITEM DATA ── total {}", outcome.role.items.len());
            println!("{:>4} {:>6} {:>6} {:>6} {:>4} {:>6}  Parts",
                     "#", "Genre", "Detail", "Part", "Lv", "Place");
            for (i, item) in outcome.role.items.iter().enumerate() {
                let parts = [
                    (item.has_standard(), "S"), (item.has_lock_soul(), "L"),
                    (item.has_bill(), "B"), (item.has_extend(), "E"),
                ].iter().filter(|(on, _)| *on).map(|(_, t)| *t).collect::<String>();
                match &item.standard {
                    Some(s) => println!("{:>4} {:>6} {:>6} {:>6} {:>4} {:>6}  {}",
                        i, s.genre(), s.detail_type, s.particular_type, s.level, s.place, parts),
                    None    => println!("{:>4} {:>6} {:>6} {:>6} {:>4} {:>6}  {}",
                        i, "-", "-", "-", "-", "-", parts),
                }
            }
            print_status(&outcome);
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn read_input(src: &Input) -> std::io::Result<Vec<u8>> {
    if !src.raw && src.input.extension().and_then(|e| e.to_str()) != Some("bak") {
        eprintln!("{}", stamp(format_args!("Warn - {} is not a .bak file", src.input.display())));
    }
    std::fs::read(&src.input)
}

fn decode(
    src:  &Input,
    data: &[u8],
    opts: DecodeOptions,
    sink: Option<&dyn LogSink>,
) -> Result<DecodeOutcome, DecodeFailure> {
    let decoder = RoleDecoder::with_options(opts);
    let decoder = match sink {
        Some(s) => decoder.with_sink(s),
        None    => decoder,
    };
    tracing::info!(path = %src.input.display(), raw = src.raw, bytes = data.len(), "decoding");
    if src.raw { decoder.decode_payload(data) } else { decoder.decode(data) }
}

fn print_status(outcome: &DecodeOutcome) {
    match &outcome.failure {
        None    => println!("Status:      complete ({} B consumed)", outcome.consumed),
        Some(f) => println!("Status:      partial, {f}"),
    }
}
