use probsql::classify::classify;
use probsql::expr::{BinaryOperator, Expr, Literal, SqlType};
use probsql::operator::registry;
use probsql::translate::Translator;
use probsql::ProbsqlError;

fn gate(name: &str) -> Expr {
    Expr::column(1, name, SqlType::Gate)
}
fn cmp(op: BinaryOperator, l: &str, r: &str) -> Expr {
    Expr::binary(op, gate(l), gate(r))
}
fn translator() -> Translator<'static> {
    Translator::new(registry())
}

#[test]
fn comparison_becomes_a_gate_call() {
    let filter = Expr::and(vec![
        cmp(BinaryOperator::Lt, "x1", "x2"),
        Expr::binary(BinaryOperator::NotEq, Expr::column(1, "name", SqlType::Text), Expr::text("Singapore")),
    ]);
    let translated = translator().translate_opt(classify(&filter).unwrap()).unwrap().unwrap();
    assert_eq!(translated.to_string(), "less_than(x1, x2)");
    assert_eq!(translated.data_type(), SqlType::Gate);
}

#[test]
fn every_comparison_has_its_function() {
    let expected = [
        (BinaryOperator::LtEq, "less_than_or_equal"),
        (BinaryOperator::Lt, "less_than"),
        (BinaryOperator::GtEq, "more_than_or_equal"),
        (BinaryOperator::Gt, "more_than"),
        (BinaryOperator::Eq, "equal_to"),
        (BinaryOperator::NotEq, "not_equal_to"),
    ];
    for (op, function) in expected {
        let translated = translator().translate(cmp(op, "a", "b")).unwrap();
        assert_eq!(translated.to_string(), format!("{function}(a, b)"));
    }
}

#[test]
fn connectives_fold_from_the_left() {
    let filter = Expr::or(vec![
        cmp(BinaryOperator::Lt, "a", "b"),
        cmp(BinaryOperator::Gt, "c", "d"),
        cmp(BinaryOperator::Eq, "e", "f"),
    ]);
    assert_eq!(
        translator().translate(filter).unwrap().to_string(),
        "or_gate(or_gate(less_than(a, b), more_than(c, d)), equal_to(e, f))"
    );
    let single = Expr::and(vec![cmp(BinaryOperator::Lt, "a", "b")]);
    assert_eq!(translator().translate(single).unwrap().to_string(), "less_than(a, b)");
    assert!(matches!(
        translator().translate(Expr::and(vec![])),
        Err(ProbsqlError::UnsupportedConstruct(_))
    ));
}

#[test]
fn not_becomes_negate() {
    let filter = Expr::not(Expr::and(vec![cmp(BinaryOperator::Lt, "a", "b"), cmp(BinaryOperator::LtEq, "c", "d")]));
    assert_eq!(
        translator().translate(filter).unwrap().to_string(),
        "negate(and_gate(less_than(a, b), less_than_or_equal(c, d)))"
    );
}

#[test]
fn arithmetic_and_leaves_pass_through() {
    let sum = Expr::binary(BinaryOperator::Plus, gate("a"), Expr::literal(Literal::Float(2.5)));
    assert_eq!(translator().translate(sum.clone()).unwrap(), sum);
    let cast = Expr::coerce(Expr::text("poisson(3)"), SqlType::Gate);
    assert_eq!(translator().translate(cast.clone()).unwrap(), cast);

    let filter = Expr::binary(BinaryOperator::GtEq, sum, cast);
    assert_eq!(
        translator().translate(filter).unwrap().to_string(),
        "more_than_or_equal(a + 2.5, 'poisson(3)'::gate)"
    );
}

#[test]
fn translating_twice_changes_nothing() {
    let filter = Expr::and(vec![
        cmp(BinaryOperator::Lt, "a", "b"),
        Expr::not(cmp(BinaryOperator::Eq, "c", "d")),
    ]);
    let once = translator().translate(filter).unwrap();
    assert_eq!(translator().translate(once.clone()).unwrap(), once);
}

#[test]
fn foreign_functions_and_nodes_are_rejected() {
    let call = Expr::function("lower", vec![Expr::text("A")], SqlType::Text);
    match translator().translate(call) {
        Err(ProbsqlError::UnsupportedConstruct(message)) => assert!(message.contains("lower('A')")),
        other => panic!("{other:?}"),
    }
    let is_null = Expr::IsNull(Box::new(gate("a")));
    assert!(matches!(translator().translate(is_null), Err(ProbsqlError::UnsupportedConstruct(_))));
}

#[test]
fn nothing_translates_to_nothing() {
    assert_eq!(translator().translate_opt(None).unwrap(), None);
}
