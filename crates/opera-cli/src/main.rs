use std::process::ExitCode;

use clap::Parser;
use colored::Colorize as _;
use opera::{
	eval::eval,
	lexer::tokenize,
	model::{Body, VariableTable},
	parser::{parse_program, TokenQueue},
	Context,
	Driver,
};

/// An interpreter for a language where every syntactic construct is a user-defined operator.
#[derive(Parser)]
#[command(name = "opera", version, about)]
struct Cli {
	/// The source file to interpret.
	file: String,

	/// Dump the token stream and exit.
	#[arg(short = 'l', long = "lexer", conflicts_with_all = ["parser", "semantic", "run"])]
	lexer: bool,

	/// Dump the parsed (pre-resolution) declarations and exit.
	#[arg(short = 'p', long = "parser", conflicts_with_all = ["lexer", "semantic", "run"])]
	parser: bool,

	/// Dump the resolved operator table and exit.
	#[arg(short = 's', long = "semantic", conflicts_with_all = ["lexer", "parser", "run"])]
	semantic: bool,

	/// Run the program. The default when no other mode flag is given.
	#[arg(short = 'r', long = "run", conflicts_with_all = ["lexer", "parser", "semantic"])]
	run: bool,
}

fn print_diagnostics(context: &Context) {
	for diagnostic in context.diagnostics() {
		eprintln!("{}", diagnostic.to_string().red());
	}
}

fn exit_code_for(context: &Context) -> ExitCode {
	if context.diagnostics().is_empty() {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}

fn dump_table(table: &opera::table::OperatorTable) {
	for name in table.category_names() {
		println!("category {name} = {}", table.category_value(name).expect("name came from category_names"));
	}
	for name in table.nullary_names() {
		println!("f {} {name}  ({} overload(s))", table.priority_of_nullary(name).expect("name came from nullary_names"), table.nullary_overloads(table.resolve_nullary(name).expect("name exists")).len());
	}
	for name in table.prefix_names() {
		println!("fx/fy {} {name}  ({} overload(s))", table.priority_of_prefix(name).expect("name came from prefix_names"), table.prefix_overloads(table.resolve_prefix(name).expect("name exists")).len());
	}
	for name in table.postfix_names() {
		println!("xf/yf {} {name}  ({} overload(s))", table.priority_of_postfix(name).expect("name came from postfix_names"), table.postfix_overloads(table.resolve_postfix(name).expect("name exists")).len());
	}
	for name in table.binary_names() {
		println!("xfx/xfy/yfx {} {name}  ({} overload(s))", table.priority_of_binary(name).expect("name came from binary_names"), table.binary_overloads(table.resolve_binary(name).expect("name exists")).len());
	}
}

fn main() -> ExitCode {
	let cli = Cli::parse();

	let mut context = Context::new(std::path::Path::new(&cli.file).parent().unwrap_or_else(|| std::path::Path::new(".")));

	let source = match std::fs::read_to_string(&cli.file) {
		Ok(source) => source,
		Err(error) => {
			eprintln!("{}", format!("Error: could not read \"{}\": {error}", cli.file).red());
			return ExitCode::FAILURE;
		},
	};

	let tokens = tokenize(&source, &mut context);

	if cli.lexer {
		for token in &tokens {
			println!("{:<12} {:<20} {}", token.id.to_string(), format!("{:?}", token.lexeme), token.span);
		}
		print_diagnostics(&context);
		return exit_code_for(&context);
	}

	let mut queue: TokenQueue = tokens.into();
	let (statements, diagnostics) = parse_program(&mut queue);
	for diagnostic in diagnostics.into_vec() {
		context.add_diagnostic(diagnostic);
	}

	if cli.parser {
		for statement in &statements {
			println!("{statement:#?}");
		}
		print_diagnostics(&context);
		return exit_code_for(&context);
	}

	let abort_on_error = !cli.semantic;
	let mut driver = Driver::new();
	driver.process_program(statements, &mut context, abort_on_error);

	if cli.semantic {
		dump_table(driver.table());
		print_diagnostics(&context);
		return exit_code_for(&context);
	}

	if !context.diagnostics().is_empty() {
		print_diagnostics(&context);
		return ExitCode::FAILURE;
	}

	match driver.table().last_registered_nullary() {
		Some(op_id) => match eval(&Body::NullaryCall(op_id), &VariableTable::new(), driver.table()) {
			Ok(value) => {
				println!("{value}");
				ExitCode::SUCCESS
			},
			Err(error) => {
				eprintln!("{}", format!("Runtime: {error}").red());
				ExitCode::FAILURE
			},
		},
		None => {
			eprintln!("{}", "Error: no nullary operator was declared".red());
			ExitCode::FAILURE
		},
	}
}
