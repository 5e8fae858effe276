use std::path::PathBuf;
use std::process;

use log::info;

mod client;
mod error;
mod form;
mod render;
mod task;
mod types;
mod utils;

use client::{PredictBackend, PredictClient};
use form::PredictForm;
use task::Task;

const DEFAULT_OUT_PATH: &str = "processed_image.png";

fn print_usage() {
    eprintln!(
        r#"predict_client_rs - send inputs to the local prediction service

USAGE:
    predict_client_rs <TASK> [OPTIONS]
    predict_client_rs --ping

TASKS:
    numeric              numeric classification (--input)
    image                image classification (--file)
    handwritten_digit    digit recognition (--file, writes the processed image)
    text                 text classification (--text)
    regression           two-feature regression (--feature1, --feature2)

OPTIONS:
    -i, --input <MATRIX>    rows separated by newlines, cells by commas
                            (default: "1.0,2.0,3.0,4.0")
    -t, --text <TEXT>       text to classify
    -f, --file <PATH>       image file to upload
    --feature1 <NUM>        first regression feature (required for regression)
    --feature2 <NUM>        second regression feature
    --threshold <NUM>       regression confidence threshold
    -o, --out <PATH>        where to write the processed image
                            (default: processed_image.png)
    --base-url <URL>        service base URL (default: $PREDICT_API_URL or
                            http://localhost:8000)
    --ping                  check the service is reachable and exit
    -h, --help              print this help
"#
    );
}

#[derive(Debug)]
struct CliArgs {
    task: Option<Task>,
    input: Option<String>,
    text: Option<String>,
    file: Option<PathBuf>,
    feature1: Option<f64>,
    feature2: Option<f64>,
    threshold: Option<f64>,
    out: PathBuf,
    base_url: Option<String>,
    ping: bool,
}

fn parse_args(mut iter: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut args = CliArgs {
        task: None,
        input: None,
        text: None,
        file: None,
        feature1: None,
        feature2: None,
        threshold: None,
        out: PathBuf::from(DEFAULT_OUT_PATH),
        base_url: None,
        ping: false,
    };

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "-i" | "--input" => args.input = Some(expect_value(&mut iter, &arg)?),
            "-t" | "--text" => args.text = Some(expect_value(&mut iter, &arg)?),
            "-f" | "--file" => args.file = Some(PathBuf::from(expect_value(&mut iter, &arg)?)),
            "--feature1" => args.feature1 = Some(expect_number(&mut iter, &arg)?),
            "--feature2" => args.feature2 = Some(expect_number(&mut iter, &arg)?),
            "--threshold" => args.threshold = Some(expect_number(&mut iter, &arg)?),
            "-o" | "--out" => args.out = PathBuf::from(expect_value(&mut iter, &arg)?),
            "--base-url" => args.base_url = Some(expect_value(&mut iter, &arg)?),
            "--ping" => args.ping = true,
            other if args.task.is_none() && !other.starts_with('-') => {
                args.task = Some(other.parse::<Task>().map_err(|e| e.to_string())?);
            }
            other => return Err(format!("unknown argument `{}`", other)),
        }
    }

    Ok(args)
}

fn expect_value(
    iter: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<String, String> {
    iter.next().ok_or_else(|| format!("{} requires a value", flag))
}

fn expect_number(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<f64, String> {
    let raw = expect_value(iter, flag)?;
    raw.parse()
        .map_err(|_| format!("{} must be a number, got `{}`", flag, raw))
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("error: {}", msg);
            print_usage();
            process::exit(2);
        }
    };

    let base_url = args.base_url.unwrap_or_else(utils::get_env);
    info!("prediction service at {}", base_url);
    let client = PredictClient::new(base_url);

    if args.ping {
        match client.hello().await {
            Ok(message) => println!("{}", message),
            Err(e) => {
                eprintln!("エラー: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let task = match args.task {
        Some(task) => task,
        None => {
            eprintln!("error: no task given");
            print_usage();
            process::exit(2);
        }
    };

    let mut form = PredictForm::new(task);
    if let Some(input) = args.input {
        form.numeric_input = input;
    }
    if let Some(text) = args.text {
        form.text_input = text;
    }
    form.image_file = args.file;
    if form.image_file.is_some() && !task.is_image_task() {
        eprintln!("note: --file is only sent for image tasks, ignoring it");
        form.image_file = None;
    }
    form.feature1 = args.feature1;
    form.feature2 = args.feature2;
    form.confidence_threshold = args.threshold;

    if let Err(e) = form.submit(&client).await {
        eprintln!("エラー: {}", e);
        process::exit(1);
    }

    if let Some(error) = &form.error {
        eprintln!("{}", error);
        process::exit(1);
    }
    if let Some(result) = &form.result {
        println!("{}", result);
    }
    if let Some(bytes) = &form.processed_image {
        match render::save_processed_image(bytes, &args.out) {
            Ok((width, height)) => {
                println!(
                    "モデルを適用した画像: {} ({}x{})",
                    args.out.display(),
                    width,
                    height
                );
            }
            Err(e) => {
                eprintln!("エラー: {}", e);
                process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> impl Iterator<Item = String> {
        args.iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_parse_numeric_task_args() {
        let args = parse_args(argv(&["numeric", "-i", "1,2\n3,4"])).unwrap();
        assert_eq!(args.task, Some(Task::Numeric));
        assert_eq!(args.input.as_deref(), Some("1,2\n3,4"));
        assert_eq!(args.out, PathBuf::from(DEFAULT_OUT_PATH));
    }

    #[test]
    fn test_parse_regression_args() {
        let args = parse_args(argv(&[
            "regression",
            "--feature1",
            "1.5",
            "--feature2",
            "-2.0",
        ]))
        .unwrap();
        assert_eq!(args.task, Some(Task::Regression));
        assert_eq!(args.feature1, Some(1.5));
        assert_eq!(args.feature2, Some(-2.0));
        assert_eq!(args.threshold, None);
    }

    #[test]
    fn test_parse_file_and_out_args() {
        let args = parse_args(argv(&[
            "handwritten_digit",
            "--file",
            "digit.png",
            "--out",
            "result.png",
        ]))
        .unwrap();
        assert_eq!(args.task, Some(Task::HandwrittenDigit));
        assert_eq!(args.file, Some(PathBuf::from("digit.png")));
        assert_eq!(args.out, PathBuf::from("result.png"));
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        assert!(parse_args(argv(&["numeric", "--frobnicate"])).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_task() {
        let err = parse_args(argv(&["audio"])).unwrap_err();
        assert!(err.contains("audio"));
    }

    #[test]
    fn test_parse_rejects_missing_flag_value() {
        let err = parse_args(argv(&["numeric", "--input"])).unwrap_err();
        assert!(err.contains("--input"));
    }

    #[test]
    fn test_parse_rejects_non_numeric_feature() {
        let err = parse_args(argv(&["regression", "--feature1", "abc"])).unwrap_err();
        assert!(err.contains("--feature1"));
    }

    #[test]
    fn test_parse_ping_flag() {
        let args = parse_args(argv(&["--ping"])).unwrap();
        assert!(args.ping);
        assert!(args.task.is_none());
    }
}
