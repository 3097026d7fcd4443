use axios_review::{Config, ConsoleNotifier, FormBridge, Page, Session};
use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use tokio::task::LocalSet;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const DEFAULT_CONFIG: &str = "axios_review.toml";
const USAGE: &str = "usage: axios_review [review|exercise] [--config FILE] [TITLE...]";

#[derive(Debug, PartialEq)]
struct Args {
    page: Page,
    config: PathBuf,
    titles: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut args = args.into_iter().peekable();

    let page = match args.peek().map(|a| Page::from_name(a)) {
        Some(Some(page)) => {
            args.next();
            page
        }
        _ => Page::Review,
    };

    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut titles = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| format!("--config needs a path\n{USAGE}"))?;
                config = PathBuf::from(path);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => titles.push(arg),
        }
    }

    Ok(Args {
        page,
        config,
        titles,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BoxError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(env::args().skip(1))?;
    let config = Config::load(&args.config)?;
    log::info!("loading {:?} page", args.page);

    let session = Session::new(args.page.document(), config.api, Rc::new(ConsoleNotifier));

    // Single UI thread: every continuation runs on this LocalSet.
    LocalSet::new()
        .run_until(async {
            let mut handles = args.page.load(&session)?;

            if !args.titles.is_empty() {
                match args.page.form_example() {
                    Some(example) => {
                        let bridge = FormBridge::new(session.clone(), example);
                        for title in &args.titles {
                            handles.push(bridge.type_and_submit(title)?);
                        }
                    }
                    None => log::warn!("{:?} page has no form, ignoring titles", args.page),
                }
            }

            for handle in handles {
                if let Err(err) = handle.await {
                    log::error!("example task failed: {err}");
                }
            }
            Ok::<_, BoxError>(())
        })
        .await?;

    println!("{}", session.html());
    Ok(())
}
