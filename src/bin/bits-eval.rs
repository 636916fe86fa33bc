use clap::Parser;
use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use bits_rust::bits_common_rs::packet::debug::PacketDebugLogger;
use bits_rust::bits_common_rs::packet::decoder::PacketDecoder;
use bits_rust::bits_common_rs::utils::config_loader::{BitsConfig, ConfigLoader};
use bits_rust::bits_common_rs::utils::hex_input::{decode_hex, read_hex_file, read_hex_from};
use bits_rust::bits_common_rs::utils::log_config::init_logging;

#[derive(Parser)]
#[command(name = "bits-eval")]
#[command(about = "BITS パケット評価ツール")]
#[command(version = "0.1.0")]
#[command(long_about = "
BITS (ビットパック形式の入れ子パケット) 評価ツール

16進文字列で与えられた1メッセージをデコードし、式として評価した値を出力します。
入力は引数、--file、標準入力の順に探します。
")]
struct Cli {
    /// 16進文字列 (省略時は --file または標準入力)
    hex: Option<String>,

    /// 16進文字列を含むファイル
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// デコードした木を表示
    #[arg(short, long)]
    tree: bool,

    /// バージョンの合計を表示
    #[arg(short, long)]
    versions: bool,

    /// 設定ファイル (TOML / JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// デバッグモード
    #[arg(short, long)]
    debug: bool,
}

fn load_config(path: Option<&Path>) -> Result<BitsConfig, String> {
    match path {
        Some(path) => {
            let loader = ConfigLoader::with_paths(vec![path.to_path_buf()]);
            let config = loader.load_from_file(path)?;
            loader.validate_config(&config)?;
            Ok(config)
        }
        None => ConfigLoader::new().load(),
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging, cli.debug)?;

    let bytes = match (&cli.hex, &cli.file) {
        (Some(hex), _) => decode_hex(hex)?,
        (None, Some(path)) => read_hex_file(path)?,
        (None, None) => read_hex_from(io::stdin().lock())?,
    };
    PacketDebugLogger::log_message(&bytes);

    let mut decoder = PacketDecoder::from_slice(&bytes).with_max_depth(config.decoder.max_depth);

    if cli.tree || cli.versions {
        let packet = decoder.decode_tree()?;
        PacketDebugLogger::log_tree(&packet);
        if cli.tree {
            print!("{}", PacketDebugLogger::render_tree(&packet));
        }
        if cli.versions {
            println!("バージョン合計: {}", packet.version_sum());
        }
        println!("{}", packet.evaluate()?);
    } else {
        println!("{}", decoder.evaluate()?);
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("❌ {}", err);
        process::exit(1);
    }
}
