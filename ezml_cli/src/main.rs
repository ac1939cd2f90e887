use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use ezml_cli::Commands;
use ezml_cli::EzmlCli;
use ezml_core::AnyEmptyResult;
use ezml_core::Binding;
use ezml_core::Engine;
use ezml_core::EzmlConfig;
use ezml_core::Variables;
use ezml_core::read_variables_file;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

fn main() {
	let args = EzmlCli::parse();
	init_tracing(args.verbose);

	let result = match &args.command {
		Some(Commands::Render {
			template,
			data,
			set,
			text,
		}) => run_render(&args, template.as_deref(), data, set, *text),
		Some(Commands::Bindings { template }) => run_bindings(&args, template.as_deref()),
		None => {
			eprintln!("No subcommand specified. Run `ezml --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		eprintln!("error: {e}");
		process::exit(1);
	}
}

fn init_tracing(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::from_default_env()
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn resolve_root(args: &EzmlCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Resolve the template path from the argument or the config, relative to
/// the project root.
fn resolve_template(
	root: &Path,
	template: Option<&Path>,
	config: Option<&EzmlConfig>,
) -> Result<PathBuf, ezml_core::AnyError> {
	let path = template
		.map(Path::to_path_buf)
		.or_else(|| config.and_then(|config| config.template.clone()));

	match path {
		Some(path) if path.is_absolute() => Ok(path),
		Some(path) => Ok(root.join(path)),
		None => Err("no template specified: pass one as an argument or set `template` in ezml.toml".into()),
	}
}

fn load_engine(root: &Path, template: Option<&Path>) -> Result<(Engine, Variables), ezml_core::AnyError> {
	let config = EzmlConfig::load(root)?;
	let template_path = resolve_template(root, template, config.as_ref())?;
	let source = std::fs::read_to_string(&template_path)?;
	let engine = Engine::from_markup(source)?;

	let variables = match &config {
		Some(config) => config.load_variables(root)?,
		None => Variables::new(),
	};

	Ok((engine, variables))
}

fn run_render(
	args: &EzmlCli,
	template: Option<&Path>,
	data: &[PathBuf],
	set: &[String],
	text: bool,
) -> AnyEmptyResult {
	let root = resolve_root(args);
	let (mut engine, mut variables) = load_engine(&root, template)?;

	for path in data {
		let path = if path.is_absolute() {
			path.clone()
		} else {
			root.join(path)
		};
		variables.extend(read_variables_file(&path)?);
	}

	for entry in set {
		let Some((name, raw)) = entry.split_once('=') else {
			return Err(format!("invalid --set `{entry}`: expected NAME=JSON").into());
		};
		// A bare word that is not valid JSON is taken as a string literal.
		let value = serde_json::from_str(raw)
			.unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
		variables.insert(name.to_string(), value);
	}

	if args.verbose {
		eprintln!(
			"Rendering with {} variable(s), {} binding(s)",
			variables.len(),
			engine.bindings().count()
		);
	}

	engine.set_variables(variables);

	if text {
		println!("{}", engine.visible_text());
	} else {
		println!("{}", engine.render());
	}

	Ok(())
}

fn run_bindings(args: &EzmlCli, template: Option<&Path>) -> AnyEmptyResult {
	let root = resolve_root(args);
	let (engine, _) = load_engine(&root, template)?;

	let mut count = 0;
	for (_, binding) in engine.bindings() {
		count += 1;
		match binding {
			Binding::Conditional { var } => {
				println!("  {} {var}", "if".green());
			}
			Binding::ValueSlot { var } => {
				println!("  {} {var}", "value".blue());
			}
			Binding::Repeater {
				var,
				element,
				counter,
			} => {
				let element = element.as_deref().unwrap_or("-");
				let counter = counter.as_deref().unwrap_or("-");
				println!(
					"  {} {var} (element: {element}, counter: {counter})",
					"for".yellow()
				);
			}
		}
	}

	println!("{count} binding(s) registered.");

	Ok(())
}
