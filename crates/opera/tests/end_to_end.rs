use opera::{
	api::diagnostics::{Error, ResolveError},
	eval::eval,
	lexer::tokenize,
	model::{Body, VariableTable, Value},
	parser::{parse_program, TokenQueue},
	Context,
	Driver,
};

fn run(source: &str) -> (Driver, Context) {
	let mut context = Context::new(".");
	let tokens = tokenize(source, &mut context);
	let mut queue: TokenQueue = tokens.into();
	let (statements, diagnostics) = parse_program(&mut queue);
	for diagnostic in diagnostics.into_vec() {
		context.add_diagnostic(diagnostic);
	}
	let mut driver = Driver::new();
	driver.process_program(statements, &mut context, true);
	(driver, context)
}

fn final_value(driver: &Driver) -> Value {
	let op_id = driver.table().last_registered_nullary().expect("a nullary operator was declared");
	eval(&Body::NullaryCall(op_id), &VariableTable::new(), driver.table()).expect("the program evaluates without a runtime error")
}

#[test]
fn scenario_1_bare_nullary_literal() {
	let (driver, context) = run("f 0 main\n  42");
	assert!(context.diagnostics().is_empty());
	assert_eq!(final_value(&driver), Value::Num(42));
}

#[test]
fn scenario_2_binary_operator_returning_its_left_operand() {
	let source = "xfx 500 X plus Y\n  X\nf 0 seven\n  3 plus 4";
	let (driver, context) = run(source);
	assert!(context.diagnostics().is_empty());
	assert_eq!(final_value(&driver), Value::Num(3));
}

#[test]
fn scenario_3_priority_drives_which_tree_is_built() {
	let source = "xfx 500 X plus Y\n  X\nxfx 400 X times Y\n  X\nf 0 main\n  1 plus 2 times 3";
	let (driver, context) = run(source);
	assert!(context.diagnostics().is_empty());
	assert_eq!(final_value(&driver), Value::Num(1));
}

#[test]
fn scenario_4_pair_literal() {
	let (driver, context) = run("f 0 main\n  {1, 2, 3}");
	assert!(context.diagnostics().is_empty());
	assert_eq!(final_value(&driver), Value::pair(Value::Num(1), Value::pair(Value::Num(2), Value::Num(3))));
}

#[test]
fn scenario_5_numeric_literal_overload_is_tried_first() {
	let source = "xf 300 0 fact\n  1\nxf 300 X fact\n  X\nf 0 main\n  0 fact";
	let (driver, context) = run(source);
	assert!(context.diagnostics().is_empty());
	assert_eq!(final_value(&driver), Value::Num(1));
}

#[test]
fn scenario_6_ambiguous_grammar_is_diagnosed_not_guessed() {
	// `plus` tolerates a same-priority right operand (xfy); `times` tolerates a same-priority
	// left operand (yfx). At equal priority, "1 plus 2 times 3" then derives two distinct trees -
	// plus(1, times(2, 3)) and times(plus(1, 2), 3) - and the resolver must refuse to pick one.
	let source = "xfy 500 X plus Y\n  X\nyfx 500 X times Y\n  X\nf 0 main\n  1 plus 2 times 3";
	let (_driver, context) = run(source);
	assert!(context.diagnostics().iter().any(|diagnostic| matches!(diagnostic.error, Error::Resolve(ResolveError::AmbiguousExpression))));
}

#[test]
fn named_operator_definition_alone_declares_no_nullary() {
	let (driver, context) = run("xfx 500 X plus Y\n  X");
	assert!(context.diagnostics().is_empty());
	assert!(driver.table().last_registered_nullary().is_none());
	assert!(driver.table().exists_binary("plus"));
}

#[test]
fn category_cannot_collide_with_a_nullary_operator_name() {
	let (_driver, context) = run("f 0 red\n  1\ncategory red");
	assert!(context.diagnostics().iter().any(|diagnostic| matches!(diagnostic.error, Error::Definition(_))));
}

#[test]
fn restricted_pattern_rejects_non_numeric_arguments() {
	let source = "fx 400 double {X}\n  X\nf 0 main\n  double {1, 2}";
	let (driver, context) = run(source);
	assert!(context.diagnostics().is_empty());
	let op_id = driver.table().last_registered_nullary().unwrap();
	let result = eval(&Body::NullaryCall(op_id), &VariableTable::new(), driver.table());
	assert!(result.is_err());
}
