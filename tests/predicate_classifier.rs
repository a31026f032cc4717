use probsql::classify::{classify, classify_filter};
use probsql::expr::{BinaryOperator, Expr, Literal, SqlType};
use probsql::gate::Gate;
use probsql::ProbsqlError;

// x1, x2 are gate columns of the first table, name is an ordinary one
fn x1() -> Expr {
    Expr::column(1, "x1", SqlType::Gate)
}
fn x2() -> Expr {
    Expr::column(1, "x2", SqlType::Gate)
}
fn name_is(op: BinaryOperator, country: &str) -> Expr {
    Expr::binary(op, Expr::column(1, "name", SqlType::Text), Expr::text(country))
}
fn x1_lt_x2() -> Expr {
    Expr::binary(BinaryOperator::Lt, x1(), x2())
}

#[test]
fn deterministic_sibling_of_and_is_pruned() {
    let filter = Expr::and(vec![x1_lt_x2(), name_is(BinaryOperator::NotEq, "Singapore")]);
    assert_eq!(classify(&filter).unwrap(), Some(x1_lt_x2()));
}

#[test]
fn nested_deterministic_branches_are_pruned() {
    let filter = Expr::and(vec![
        Expr::or(vec![x1_lt_x2(), name_is(BinaryOperator::Eq, "Malaysia")]),
        name_is(BinaryOperator::NotEq, "Singapore"),
    ]);
    let pruned = classify(&filter).unwrap().unwrap();
    assert_eq!(pruned, x1_lt_x2());
    assert_eq!(pruned.to_string(), "x1 < x2");
}

#[test]
fn nothing_relevant_gives_none() {
    let filter = Expr::and(vec![
        name_is(BinaryOperator::Eq, "Malaysia"),
        Expr::not(name_is(BinaryOperator::Eq, "Singapore")),
    ]);
    assert_eq!(classify(&filter).unwrap(), None);
    assert_eq!(classify_filter(None).unwrap(), None);
}

#[test]
fn relevant_siblings_are_kept_over_pruned_children() {
    let x3_gt_one = Expr::binary(BinaryOperator::Gt, Expr::column(2, "x3", SqlType::Gate), Expr::literal(Literal::Float(1.0)));
    let filter = Expr::or(vec![
        Expr::and(vec![x1_lt_x2(), name_is(BinaryOperator::Eq, "Malaysia")]),
        name_is(BinaryOperator::Eq, "Laos"),
        x3_gt_one.clone(),
    ]);
    assert_eq!(classify(&filter).unwrap(), Some(Expr::or(vec![x1_lt_x2(), x3_gt_one])));
}

#[test]
fn arithmetic_and_not_are_kept_whole() {
    // (x1 + 2) * price > 10: one gate operand keeps the whole comparison
    let arithmetic = Expr::binary(
        BinaryOperator::Gt,
        Expr::binary(
            BinaryOperator::Multiply,
            Expr::binary(BinaryOperator::Plus, x1(), Expr::literal(Literal::Integer(2))),
            Expr::column(1, "price", SqlType::Float),
        ),
        Expr::literal(Literal::Integer(10)),
    );
    assert_eq!(classify(&arithmetic).unwrap(), Some(arithmetic.clone()));

    let negated = Expr::not(Expr::and(vec![x1_lt_x2(), name_is(BinaryOperator::Eq, "Laos")]));
    assert_eq!(classify(&negated).unwrap(), Some(negated.clone()));
}

#[test]
fn gate_literals_and_casts_are_relevant() {
    let literal = Expr::binary(BinaryOperator::Lt, Expr::literal(Literal::Gate(Gate::poisson(2.0))), x1());
    assert_eq!(classify(&literal).unwrap(), Some(literal.clone()));
    let cast = Expr::binary(
        BinaryOperator::GtEq,
        Expr::column(1, "price", SqlType::Float),
        Expr::coerce(Expr::text("gaussian(1, 2)"), SqlType::Gate),
    );
    assert_eq!(classify(&cast).unwrap(), Some(cast.clone()));
    // a cast away from gate is deterministic
    let away = Expr::binary(
        BinaryOperator::Eq,
        Expr::coerce(x1(), SqlType::Text),
        Expr::text("gaussian(1.00, 2.00)"),
    );
    assert_eq!(classify(&away).unwrap(), None);
}

#[test]
fn pruned_trees_are_a_fixed_point() {
    let filters = [
        Expr::and(vec![x1_lt_x2(), name_is(BinaryOperator::NotEq, "Singapore")]),
        Expr::or(vec![
            x1_lt_x2(),
            Expr::not(Expr::binary(BinaryOperator::Eq, x2(), Expr::literal(Literal::Integer(3)))),
            name_is(BinaryOperator::Eq, "Laos"),
        ]),
    ];
    for filter in filters {
        let pruned = classify(&filter).unwrap().unwrap();
        assert_eq!(classify(&pruned).unwrap(), Some(pruned));
    }
}

#[test]
fn functions_are_opaque() {
    let filter = Expr::and(vec![
        x1_lt_x2(),
        Expr::function("random_check", vec![Expr::column(1, "name", SqlType::Text)], SqlType::Boolean),
    ]);
    match classify(&filter) {
        Err(ProbsqlError::UnsupportedConstruct(message)) => assert!(message.contains("random_check")),
        other => panic!("{other:?}"),
    }
}

#[test]
fn casts_do_not_hide_functions() {
    for target in [SqlType::Gate, SqlType::Text] {
        let filter = Expr::binary(
            BinaryOperator::Eq,
            Expr::coerce(Expr::function("now", vec![], SqlType::Text), target),
            Expr::text("poisson(1)"),
        );
        match classify(&filter) {
            Err(ProbsqlError::UnsupportedConstruct(message)) => assert!(message.contains("now")),
            other => panic!("{target}: {other:?}"),
        }
    }
}

#[test]
fn unknown_nodes_are_rejected() {
    let is_null = Expr::and(vec![x1_lt_x2(), Expr::IsNull(Box::new(Expr::column(1, "name", SqlType::Text)))]);
    assert!(matches!(classify(&is_null), Err(ProbsqlError::UnsupportedConstruct(_))));
    let in_list = Expr::InList {
        expr: Box::new(Expr::column(1, "name", SqlType::Text)),
        list: vec![Expr::text("Laos")],
        negated: false,
    };
    assert!(matches!(classify(&in_list), Err(ProbsqlError::UnsupportedConstruct(_))));
}

#[test]
fn input_is_not_modified() {
    let filter = Expr::and(vec![x1_lt_x2(), name_is(BinaryOperator::NotEq, "Singapore")]);
    let before = filter.clone();
    let _ = classify(&filter).unwrap();
    assert_eq!(filter, before);
}
