use clap::Parser;
use ride_along::{autosave, cli, config, error, export, interactive, logging, session, store, view};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use ride_along_common::{MetaField, Outline};
use session::Session;
use std::sync::{Arc, Mutex};
use store::FileStore;

fn load_outline(cli: &Cli, config: &Config) -> Result<Arc<Outline>> {
    let path = cli.outline.as_ref().or(config.outline_path.as_ref());
    let outline = match path {
        Some(path) => Outline::from_file(path)?,
        None => Outline::home_visit(),
    };
    Ok(Arc::new(outline))
}

fn open_session(cli: &Cli, config: &Config) -> Result<Session<FileStore>> {
    let outline = load_outline(cli, config)?;
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.resolve_data_dir());
    Ok(Session::open(outline, session::today(), FileStore::new(data_dir)))
}

/// 変更後に保存し、失敗したら警告を出す
fn save_or_warn(session: &mut Session<FileStore>) {
    if !session.save() {
        eprintln!("⚠ 保存に失敗しました（変更はこの実行中のみ有効）");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    let config = Config::load_or_default();

    match &cli.command {
        Commands::Show => {
            let session = open_session(&cli, &config)?;
            view::print_checklist(session.checklist());
        }

        Commands::Stats => {
            let session = open_session(&cli, &config)?;
            view::print_stats(session.checklist());
        }

        Commands::Toggle { section, item } => {
            let mut session = open_session(&cli, &config)?;
            let (key, label) = {
                let outline = session.checklist().outline();
                let section = session::resolve_section(outline, section)?;
                let label = session::resolve_item(section, item)?;
                (section.key.clone(), label.to_string())
            };
            let checked = session
                .checklist_mut()
                .toggle_item(&key, &label)
                .unwrap_or(false);
            save_or_warn(&mut session);
            println!("✔ [{}] {}", if checked { "X" } else { " " }, label);
            println!("{}", view::format_stats_line(&session.checklist().statistics()));
        }

        Commands::Note { section, text } => {
            let mut session = open_session(&cli, &config)?;
            let key = session::resolve_note_key(session.checklist().outline(), section)?;
            session.checklist_mut().set_note(&key, text.clone());
            save_or_warn(&mut session);
            println!("✔ メモを設定しました: {}", key);
        }

        Commands::Meta { date, evaluator, clinician } => {
            let mut session = open_session(&cli, &config)?;
            let updates = [
                (MetaField::Date, date),
                (MetaField::EvaluatorName, evaluator),
                (MetaField::ClinicianName, clinician),
            ];
            let mut changed = false;
            for (field, value) in updates {
                if let Some(value) = value {
                    session.checklist_mut().set_meta(field, value.clone());
                    changed = true;
                }
            }
            if changed {
                save_or_warn(&mut session);
                println!("✔ メタ情報を更新しました");
            }
            let meta = session.checklist().meta();
            println!("  評価日:     {}", meta.date);
            println!("  評価者:     {}", meta.evaluator_name);
            println!("  評価対象者: {}", meta.clinician_name);
        }

        Commands::Fill => {
            let session = Arc::new(Mutex::new(open_session(&cli, &config)?));
            let saver = autosave::AutoSaver::spawn(Arc::clone(&session), config.autosave_interval());

            let worker = Arc::clone(&session);
            let outcome = tokio::task::spawn_blocking(move || interactive::run_fill(worker))
                .await
                .map_err(|e| error::RideAlongError::Interactive(e.to_string()));

            // 入力の成否にかかわらずタイマーは止めて最終保存する
            saver.stop();
            save_or_warn(&mut autosave::lock_session(&session));
            outcome??;

            println!("\n✅ 保存しました");
        }

        Commands::Export { output } => {
            let session = open_session(&cli, &config)?;
            let output_dir = output.clone().unwrap_or_else(|| std::path::PathBuf::from("."));
            let path = export::write_report(session.checklist(), &output_dir)?;
            println!("✔ レポート出力: {}", path.display());
        }

        Commands::Mail { to } => {
            let session = open_session(&cli, &config)?;
            let recipient = to.as_deref().unwrap_or_else(|| config.recipient());
            println!("{}", export::build_mailto(session.checklist(), recipient));
        }

        Commands::Reset => {
            let mut session = open_session(&cli, &config)?;
            session.checklist_mut().reset();
            save_or_warn(&mut session);
            println!("✔ チェックとメモをリセットしました（メタ情報は保持）");
        }

        Commands::Clear => {
            let mut session = open_session(&cli, &config)?;
            if session.clear_saved(session::today()) {
                println!("✔ 保存データを削除しました");
            } else {
                println!("保存データの削除に失敗しました");
            }
        }

        Commands::Config { set_recipient, set_interval, set_data_dir, show } => {
            let mut config = config.clone();

            if let Some(recipient) = set_recipient {
                config.set_recipient(recipient.clone())?;
                println!("✔ メール宛先を設定しました");
            }

            if let Some(secs) = set_interval {
                config.set_autosave_interval(*secs)?;
                println!("✔ 自動保存間隔を設定しました: {}秒", secs);
            }

            if let Some(dir) = set_data_dir {
                config.set_data_dir(dir.clone())?;
                println!("✔ 保存先を設定しました: {}", dir.display());
            }

            if *show {
                println!("設定:");
                println!("  保存先: {}", config.resolve_data_dir().display());
                println!("  自動保存間隔: {}秒", config.autosave_interval_secs);
                println!("  メール宛先: {}", if config.recipient().is_empty() { "未設定" } else { config.recipient() });
                println!(
                    "  アウトライン: {}",
                    config
                        .outline_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "組み込み".to_string())
                );
            }
        }
    }

    Ok(())
}
