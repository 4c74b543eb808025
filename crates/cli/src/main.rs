use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use hardstop_corelib as core;
use hardstop_corelib::convert::{self, FMT_BUF_LEN};

#[derive(Parser)]
#[command(name = "hardstop", version, about = "Numeric-safety runtime CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the native word width and the supported numeric kinds
    Probe {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a literal through the strict parser and format it back
    Convert {
        /// Numeric kind: uint8, int8, int16, int32, int64, bool
        #[arg(short, long, default_value = "int64")]
        kind: String,
        /// Parse the literal as two's-complement hex digits
        #[arg(long)]
        hex: bool,
        /// Literal to parse
        text: String,
    },
}

fn roundtrip_int<T: core::arith::IntKind>(text: &str, hex: bool) -> Result<String> {
    let mut buf = [0u8; FMT_BUF_LEN];
    let len = if hex {
        let n = convert::parse_hex::<T>(text)?;
        convert::format_hex(&mut buf, n)
    } else {
        let n = convert::parse_int::<T>(text)?;
        convert::format_int(&mut buf, n)
    };
    Ok(std::str::from_utf8(&buf[..len])?.to_owned())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Probe { json }) => {
            if json {
                let status = serde_json::json!({
                    "version": core::version(),
                    "word_bits": core::WORD_BITS,
                    "kinds": core::kind_table(),
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("hardstop {}  word={} bits", core::version(), core::WORD_BITS);
                for k in core::kind_table() {
                    println!("  {:<6}  bits={:<2}  [{} .. {}]", k.name, k.bits, k.min, k.max);
                }
            }
        }
        Some(Commands::Convert { kind, hex, text }) => {
            let rendered = match kind.as_str() {
                "uint8" => roundtrip_int::<u8>(&text, hex)?,
                "int8" => roundtrip_int::<i8>(&text, hex)?,
                "int16" => roundtrip_int::<i16>(&text, hex)?,
                "int32" => roundtrip_int::<i32>(&text, hex)?,
                "int64" => roundtrip_int::<i64>(&text, hex)?,
                "bool" => {
                    if hex {
                        bail!("bool has no hex form");
                    }
                    let b = convert::parse_bool(&text)?;
                    let mut buf = [0u8; FMT_BUF_LEN];
                    let len = convert::format_bool(&mut buf, b);
                    std::str::from_utf8(&buf[..len])?.to_owned()
                }
                other => bail!("unknown kind '{other}'"),
            };
            println!("{rendered}");
        }
        None => {
            println!("hardstop {} ready", core::version());
            println!("Try: `hardstop probe [--json]` or `hardstop convert -k int16 1234`");
        }
    }
    Ok(())
}
