use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct EzmlCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render a template against the configured variable data.
	Render {
		/// Template file. Defaults to the `template` entry in ezml.toml.
		template: Option<PathBuf>,

		/// Additional variable data files (json, toml, yaml), merged after
		/// the configured ones.
		#[arg(long)]
		data: Vec<PathBuf>,

		/// Set a single variable: `name=value` with a JSON value (a bare
		/// word is taken as a string).
		#[arg(long = "set", value_name = "NAME=JSON")]
		set: Vec<String>,

		/// Print only the visible text instead of the full markup.
		#[arg(long, default_value_t = false)]
		text: bool,
	},
	/// List the reactive bindings registered in a template.
	Bindings {
		/// Template file. Defaults to the `template` entry in ezml.toml.
		template: Option<PathBuf>,
	},
}
