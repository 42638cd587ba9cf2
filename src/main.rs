use clap::{Parser, Subcommand};
use interplog::{
    config::LoggingConfig,
    diagnostics::{report_config_error, report_template_error},
    error::TemplateError,
    logging::{sink::state_to_json, Level, Logger},
    template::{compile, parser::hole_specs, Capture, Interpolated, Value},
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "interplog", about = "Render and log structured message templates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template and print the message.
    Render {
        template: String,
        /// Hole argument, in hole order: `name=value` or a bare value.
        /// Values that parse as JSON keep their type.
        #[arg(short, long = "arg")]
        args: Vec<String>,
        /// Print message, template and properties as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Parse a template and list its holes.
    Check { template: String },
    /// Log a rendered template through a configured logger.
    Emit {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long, default_value = "information")]
        level: Level,
        template: String,
        #[arg(short, long = "arg")]
        args: Vec<String>,
    },
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Render {
            template,
            args,
            json,
        } => render(template, &args, json),
        Commands::Check { template } => check(&template),
        Commands::Emit {
            config,
            level,
            template,
            args,
        } => emit(&config, level, template, &args),
    };
    if !ok {
        process::exit(1);
    }
}

fn render(template: String, args: &[String], json: bool) -> bool {
    let record = match compile(build(template.clone(), args)) {
        Ok(record) => record,
        Err(err) => return fail(&template, &err),
    };
    if json {
        let output = serde_json::json!({
            "message": record.message(),
            "template": record.template(),
            "properties": state_to_json(record.arguments()),
        });
        println!("{output}");
    } else {
        println!("{}", record.message());
        println!("template: {}", record.template());
        for (key, value) in record.hole_arguments() {
            println!("  {key} = {value}");
        }
    }
    true
}

fn check(template: &str) -> bool {
    match hole_specs(template) {
        Ok(specs) => {
            println!("{} hole(s)", specs.len());
            for spec in specs {
                let sigil = spec.sigil.map(|s| s.prefix().to_string()).unwrap_or_default();
                let name = spec.name.as_deref().unwrap_or("<positional>");
                let mut line = format!("  {}: {sigil}{name}", spec.offset);
                if let Some(alignment) = spec.alignment {
                    line.push_str(&format!(" align={alignment}"));
                }
                if let Some(format) = &spec.format {
                    line.push_str(&format!(" format={format}"));
                }
                println!("{line}");
            }
            true
        }
        Err(err) => fail(template, &err),
    }
}

fn emit(config: &Path, level: Level, template: String, args: &[String]) -> bool {
    let logger = match LoggingConfig::load(config).and_then(|c| Logger::from_config(&c)) {
        Ok(logger) => logger,
        Err(err) => {
            report_config_error(&err);
            return false;
        }
    };
    match logger.log(level, build(template.clone(), args)) {
        Ok(()) => true,
        Err(err) => fail(&template, &err),
    }
}

fn build(template: String, args: &[String]) -> Interpolated {
    let captures = args.iter().map(|arg| parse_arg(arg)).collect();
    Interpolated::new(template, captures)
}

fn parse_arg(arg: &str) -> Capture {
    match arg.split_once('=') {
        Some((name, raw)) if !name.is_empty() => Capture::captured(name, parse_value(raw)),
        _ => Capture::from(parse_value(arg)),
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::Str(raw.to_string()))
}

fn fail(template: &str, err: &TemplateError) -> bool {
    log::debug!("template `{template}` rejected");
    report_template_error("<template>", err);
    false
}
