use crate::model::PackageName;
use crate::lang::{GeneratorError, Language, OutputHandler};
use crate::template::ModuleTemplates;
use log::{info, warn};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

const RUNTIME_PACKAGE: &str = "ttcn3.runtime";
const DEFAULT_CLASS_NAME: &str = "Templates";


pub struct JavaOptionsBuilder {
	output_dir: Option<OsString>,
	package: Option<PackageName>,
	class_name: Option<String>,
	runtime_package: Option<PackageName>,
}

pub struct JavaOptions {
	pub output_dir: OsString,

	/// Package of the generated class. Defaults to the module name.
	pub package: Option<PackageName>,
	pub class_name: String,
	pub runtime_package: PackageName,
}

impl JavaOptions {
	fn package_for(&self, module: &ModuleTemplates) -> PackageName {
		match (&self.package, module.name()) {
			(Some(package), _) => package.clone(),
			(None, Some(name)) => PackageName::from_str(&name.to_lowercase()),
			(None, None) => PackageName::new(),
		}
	}
}


fn option_str<'a>(name: &str, value: &'a OsString) -> Result<&'a str, GeneratorError> {
	value.to_str().ok_or_else(|| GeneratorError::from(format!("Invalid value for option {}", name)))
}

fn is_java_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_alphabetic() || c == '_' || c == '$' => chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$'),
		_ => false,
	}
}

fn set_once<T>(slot: &mut Option<T>, name: &str, value: T) -> Result<(), GeneratorError> {
	if slot.is_some() {
		return Err(GeneratorError::from(format!("Option {} already specified", name)))
	}

	*slot = Some(value);
	Ok(())
}

fn write_package<F : Write>(f: &mut F, package: &PackageName) -> Result<(), GeneratorError> {
	if !package.package.is_empty() {
		writeln!(f, "package {};", package)?;
		writeln!(f)?;
	}

	Ok(())
}


pub struct JavaLanguage {}

impl Language for JavaLanguage {
	type OptionsBuilder = JavaOptionsBuilder;
	type Options = JavaOptions;

	fn empty_options() -> JavaOptionsBuilder {
		JavaOptionsBuilder {
			output_dir: None,
			package: None,
			class_name: None,
			runtime_package: None,
		}
	}

	fn add_option(builder: &mut JavaOptionsBuilder, name: &str, value: OsString) -> Result<(), GeneratorError> {
		match name {
			"out_dir" => set_once(&mut builder.output_dir, name, value),
			"package" => {
				let package = PackageName::from_str(option_str(name, &value)?);
				set_once(&mut builder.package, name, package)
			},
			"class" => {
				let class_name = option_str(name, &value)?;
				if !is_java_identifier(class_name) {
					return Err(GeneratorError::from(format!("Invalid class name: {}", class_name)))
				}
				set_once(&mut builder.class_name, name, class_name.to_string())
			},
			"runtime_package" => {
				let package = PackageName::from_str(option_str(name, &value)?);
				set_once(&mut builder.runtime_package, name, package)
			},
			_ => Err(GeneratorError::from(format!("Unknown option: {}", name))),
		}
	}

	fn finalize_options(builder: Self::OptionsBuilder) -> Result<Self::Options, GeneratorError> {
		let output_dir = builder.output_dir.ok_or("Output directory not specified")?;
		Ok(JavaOptions {
			output_dir: output_dir,
			package: builder.package,
			class_name: builder.class_name.unwrap_or_else(|| DEFAULT_CLASS_NAME.to_string()),
			runtime_package: builder.runtime_package.unwrap_or_else(|| PackageName::from_str(RUNTIME_PACKAGE)),
		})
	}

	fn generate<Output: for<'output> OutputHandler<'output>>(module: &ModuleTemplates, options: &Self::Options, output: &mut Output) -> Result<(), GeneratorError> {
		for diagnostic in module.diagnostics() {
			if diagnostic.is_error() {
				warn!("{}: template dropped: {}", module.name().unwrap_or("<module>"), diagnostic);
			}
			else {
				warn!("{}: {}", module.name().unwrap_or("<module>"), diagnostic);
			}
		}

		let package = options.package_for(module);

		let mut path = PathBuf::from(&options.output_dir);
		for part in &package.package {
			path.push(part);
		}
		path.push(options.class_name.clone() + ".java");

		info!("writing {} templates to {}", module.templates().len(), path.display());

		let mut file = output.create_file(&path)?;

		write_package(&mut file, &package)?;
		writeln!(file, "import {}.*;", options.runtime_package)?;
		writeln!(file)?;
		writeln!(file, "public class {} {{", options.class_name)?;
		writeln!(file)?;
		module.write_java_source(&mut file, 1)?;
		writeln!(file, "}}")?;

		Ok(())
	}
}
