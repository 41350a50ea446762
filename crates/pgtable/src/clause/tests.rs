use super::*;
use crate::entity::{EntityDef, FieldDef, FieldKind};
use crate::options::Options;
use crate::value::Arg;
use proptest::prelude::*;

fn test_struct() -> Schema {
    let def = EntityDef::new("TestStruct")
        .field(FieldDef::new("ID", FieldKind::I64))
        .field(FieldDef::new("Flags", FieldKind::I64))
        .field(FieldDef::new("PrimaryEmail", FieldKind::String))
        .field(FieldDef::new("EmailSecondary", FieldKind::String))
        .field(FieldDef::new("FirstName", FieldKind::String))
        .field(FieldDef::new("LastName", FieldKind::String))
        .field(FieldDef::new("Age", FieldKind::I64))
        .field(FieldDef::new("Price", FieldKind::I64))
        .field(FieldDef::new("PostCode", FieldKind::String))
        .field(FieldDef::new("PostCode2", FieldKind::String))
        .field(FieldDef::new("Password", FieldKind::String).tag("sql", "pass"))
        .field(FieldDef::new("CreatedBy", FieldKind::I64))
        .field(FieldDef::new("Key", FieldKind::String).tag("sql", "uniq type:varchar(2000)"));
    Schema::reflect(&def, &Options::default())
}

fn with_age_group() -> Schema {
    let def = EntityDef::new("Person")
        .field(FieldDef::new("ID", FieldKind::I64))
        .field(FieldDef::new("Age", FieldKind::I32))
        .field(FieldDef::new("AgeGroup", FieldKind::String));
    Schema::reflect(&def, &Options::default())
}

fn raw(template: &str) -> Filters {
    Filters::new().raw(RawClause::new(template))
}

// ==================== Field filters ====================

#[test]
fn empty_filters_render_nothing() {
    let schema = test_struct();
    assert_eq!(schema.filter_clause(&Filters::new(), 1).unwrap(), "");
}

#[test]
fn operators_in_field_order() {
    let schema = test_struct();
    let filters = Filters::new()
        .filter("Price", Op::Greater, 33)
        .filter("PostCode2", Op::Like, "11%")
        .filter("Flags", Op::Bit, 4)
        .filter("FirstName", Op::Match, "^J")
        .filter("CreatedBy", Op::GreaterOrEqual, 2)
        .filter("Age", Op::LowerOrEqual, 40);

    assert_eq!(
        schema.filter_clause(&filters, 1).unwrap(),
        r#""age"<=$1 AND "created_by">=$2 AND "first_name" ~ $3 AND "flags"&$4>0 AND "post_code2" LIKE $5 AND "price">$6"#
    );
}

#[test]
fn equal_not_equal_lower() {
    let schema = test_struct();
    let filters = Filters::new()
        .filter("Age", Op::Lower, 3)
        .filter("LastName", Op::NotEqual, "Doe")
        .filter("Price", Op::Equal, 1);

    assert_eq!(
        schema.filter_clause(&filters, 1).unwrap(),
        r#""age"<$1 AND "last_name"!=$2 AND "price"=$3"#
    );
}

#[test]
fn textual_ops_cast_non_text_columns() {
    let schema = test_struct();
    let filters = Filters::new()
        .filter("Age", Op::Like, "4%")
        .filter("Price", Op::Match, "^9")
        .filter("FirstName", Op::Like, "J%");

    assert_eq!(
        schema.filter_clause(&filters, 1).unwrap(),
        r#"CAST("age" AS TEXT) LIKE $1 AND "first_name" LIKE $2 AND CAST("price" AS TEXT) ~ $3"#
    );
}

#[test]
fn numbering_starts_at_offset() {
    let schema = test_struct();
    let filters = Filters::new().filter("Price", Op::Equal, 1).filter("Age", Op::Equal, 2);
    assert_eq!(
        schema.filter_clause(&filters, 3).unwrap(),
        r#""age"=$3 AND "price"=$4"#
    );
}

#[test]
fn unknown_filter_field() {
    let schema = test_struct();
    let filters = Filters::new().filter("Nope", Op::Equal, 1);
    assert_eq!(
        schema.filter_clause(&filters, 1),
        Err(BuilderError::invalid_field("filters", "Nope"))
    );
}

// ==================== Raw clause ====================

#[test]
fn raw_clause_alone_is_parenthesized() {
    let schema = test_struct();
    let filters = Filters::new().raw(
        RawClause::new(".Price=? OR .EmailSecondary=? OR .Age IN (?)")
            .arg(1)
            .arg("x@example.com")
            .arg(vec![1, 2, 3]),
    );
    assert_eq!(
        schema.filter_clause(&filters, 1).unwrap(),
        r#"("price"=$1 OR "email_secondary"=$2 OR "age" IN ($3,$4,$5))"#
    );
}

#[test]
fn raw_clause_joined_with_or() {
    let schema = test_struct();
    let filters = Filters::new()
        .filter("PostCode2", Op::Equal, "11-111")
        .filter("Price", Op::Equal, 33)
        .raw(
            RawClause::new(
                ".Price=? OR (.EmailSecondary=? AND .Age IN (?)) OR (.Age IN (?)) OR (.EmailSecondary IN (?))",
            )
            .arg(44)
            .arg("a@example.com")
            .arg(vec![1, 2, 3, 4])
            .arg(vec![5, 6, 7])
            .arg(vec!["b@example.com", "c@example.com"])
            .conjunction(Conjunction::Or),
        );

    assert_eq!(
        schema.filter_clause(&filters, 1).unwrap(),
        r#"("post_code2"=$1 AND "price"=$2) OR ("price"=$3 OR ("email_secondary"=$4 AND "age" IN ($5,$6,$7,$8)) OR ("age" IN ($9,$10,$11)) OR ("email_secondary" IN ($12,$13)))"#
    );
}

#[test]
fn raw_clause_joined_with_and_by_default() {
    let schema = test_struct();
    let filters = Filters::new().filter("Price", Op::Equal, 1).raw(
        RawClause::new(".Price=? OR .EmailSecondary=? OR .Age IN (?)")
            .arg(2)
            .arg("x")
            .arg(vec![3, 4, 5]),
    );
    assert_eq!(
        schema.filter_clause(&filters, 1).unwrap(),
        r#"("price"=$1) AND ("price"=$2 OR "email_secondary"=$3 OR "age" IN ($4,$5,$6))"#
    );
}

#[test]
fn raw_numbering_continues_from_offset() {
    let schema = test_struct();
    let filters = Filters::new().raw(RawClause::new(".Age=?").arg(1));
    assert_eq!(schema.filter_clause(&filters, 5).unwrap(), r#"("age"=$5)"#);
}

#[test]
fn empty_raw_template_is_ignored() {
    let schema = test_struct();
    let filters = Filters::new()
        .filter("Age", Op::Equal, 1)
        .raw(RawClause::new("").arg(2));
    assert_eq!(schema.filter_clause(&filters, 1).unwrap(), r#""age"=$1"#);
}

#[test]
fn references_resolve_before_markers_are_numbered() {
    let schema = test_struct();

    // A marker ahead of the first reference still takes the first number.
    let filters = Filters::new().raw(RawClause::new("? < .Age AND .Price > ?").arg(1).arg(2));
    assert_eq!(
        schema.filter_clause(&filters, 1).unwrap(),
        r#"($1 < "age" AND "price" > $2)"#
    );

    // A bad reference after a marker fails the whole clause.
    let filters = Filters::new().raw(RawClause::new("? = .Nope").arg(1));
    assert_eq!(
        schema.filter_clause(&filters, 1),
        Err(BuilderError::invalid_field("raw", "Nope"))
    );

    // Repeated references substitute every occurrence.
    let filters = Filters::new().raw(RawClause::new(".Age>? AND .Age<?").arg(1).arg(9));
    assert_eq!(
        schema.filter_clause(&filters, 1).unwrap(),
        r#"("age">$1 AND "age"<$2)"#
    );

    // Interleaved references and markers, with a list in the middle.
    let template = RawTemplate::parse(&schema, ".Age IN (?) AND ? < .Price AND .Age <> ?").unwrap();
    let mut counter = Placeholders::starting_at(7);
    let args = [Arg::from(vec![1, 2]), Arg::from(5), Arg::from(9)];
    assert_eq!(
        template.render(&args, &mut counter).unwrap(),
        r#""age" IN ($7,$8) AND $9 < "price" AND "age" <> $10"#
    );
    assert_eq!(counter.take(), 11);

    // The reference is checked before markers are counted against arguments.
    let filters = Filters::new().raw(RawClause::new("? = .Nope AND .Age = ?").arg(1));
    assert_eq!(
        schema.filter_clause(&filters, 1),
        Err(BuilderError::invalid_field("raw", "Nope"))
    );

    // A failed render hands out no numbers.
    let template = RawTemplate::parse(&schema, ".Age = ? OR .Price = ?").unwrap();
    let mut counter = Placeholders::starting_at(3);
    assert!(template.render(&[Arg::from(1)], &mut counter).is_err());
    assert_eq!(counter.take(), 3);
}

#[test]
fn reference_is_a_maximal_identifier_run() {
    let schema = with_age_group();
    let filters = Filters::new().raw(
        RawClause::new(".AgeGroup=? AND .Age=? OR .Age_Group=?")
            .arg("adult")
            .arg(30)
            .arg("x"),
    );
    assert_eq!(
        schema.filter_clause(&filters, 1),
        Err(BuilderError::invalid_field("raw", "Age_Group"))
    );

    let filters = Filters::new().raw(RawClause::new(".AgeGroup=? AND .Age=?").arg("adult").arg(30));
    assert_eq!(
        schema.filter_clause(&filters, 1).unwrap(),
        r#"("age_group"=$1 AND "age"=$2)"#
    );
}

#[test]
fn lone_dot_is_text() {
    let schema = test_struct();
    assert_eq!(
        schema.filter_clause(&raw(".Age = 1 ."), 1).unwrap(),
        r#"("age" = 1 .)"#
    );
}

#[test]
fn raw_marker_mismatch() {
    let schema = test_struct();
    assert_eq!(
        schema.filter_clause(&raw(".Age=?"), 1),
        Err(BuilderError::RawPlaceholders {
            op: "raw",
            markers: 1,
            args: 0,
        })
    );

    let filters = Filters::new().raw(RawClause::new(".Age=1").arg(2));
    assert!(matches!(
        schema.filter_clause(&filters, 1),
        Err(BuilderError::RawPlaceholders { markers: 0, args: 1, .. })
    ));
}

#[test]
fn raw_empty_list_is_rejected() {
    let schema = test_struct();
    let filters = Filters::new().raw(
        RawClause::new(".Price > ? AND .Age IN (?)")
            .arg(1)
            .arg(Vec::<i64>::new()),
    );
    assert_eq!(
        schema.filter_clause(&filters, 1),
        Err(BuilderError::EmptyList { op: "raw", index: 1 })
    );

    let filters = Filters::new().raw(RawClause::new(".Age IN (?)").arg(vec![4]));
    assert_eq!(schema.filter_clause(&filters, 1).unwrap(), r#"("age" IN ($1))"#);
}

// ==================== Order / limit / set ====================

#[test]
fn order_directions() {
    let schema = test_struct();
    assert_eq!(
        schema.order_clause(&["EmailSecondary", "desc", "Age", "asc"]).unwrap(),
        r#""email_secondary" DESC,"age" ASC"#
    );
    assert_eq!(
        schema.order_clause(&["Age", "DESC", "Price", "whatever"]).unwrap(),
        r#""age" ASC,"price" ASC"#
    );
    assert_eq!(schema.order_clause(&[]).unwrap(), "");
}

#[test]
fn order_trailing_field_sorts_ascending() {
    let schema = test_struct();
    assert_eq!(
        schema.order_clause(&["Age", "desc", "Price"]).unwrap(),
        r#""age" DESC,"price" ASC"#
    );
}

#[test]
fn order_unknown_field() {
    let schema = test_struct();
    assert_eq!(
        schema.order_clause(&["Age", "desc", "Nope", "asc"]),
        Err(BuilderError::invalid_field("order", "Nope"))
    );
}

#[test]
fn limit_and_offset() {
    assert_eq!(limit_offset_clause(0, 0), "");
    assert_eq!(limit_offset_clause(0, 13), "");
    assert_eq!(limit_offset_clause(67, 0), "LIMIT 67");
    assert_eq!(limit_offset_clause(67, 13), "LIMIT 67 OFFSET 13");
}

#[test]
fn set_sorted_by_field() {
    let schema = test_struct();
    let values = Assignments::new()
        .set("Price", 1234)
        .set("PostCode2", "12-345")
        .set("Age", 3);
    assert_eq!(
        schema.set_clause(&values).unwrap(),
        (r#""age"=$1,"post_code2"=$2,"price"=$3"#.to_string(), 3)
    );
}

#[test]
fn set_errors() {
    let schema = test_struct();
    assert_eq!(
        schema.set_clause(&Assignments::new()),
        Err(BuilderError::EmptySet { op: "set" })
    );
    assert_eq!(
        schema.set_clause(&Assignments::new().set("Nope", 1)),
        Err(BuilderError::invalid_field("set", "Nope"))
    );
}

// ==================== Determinism ====================

const FIELDS: [&str; 6] = ["Age", "Price", "FirstName", "PostCode2", "CreatedBy", "Flags"];

proptest! {
    #[test]
    fn filter_text_ignores_insertion_order(
        picks in proptest::sample::subsequence(FIELDS.to_vec(), 1..=FIELDS.len()),
        first in 1usize..20,
    ) {
        let schema = test_struct();

        let mut forward = Filters::new();
        for field in &picks {
            forward.insert(*field, Filter::new(Op::Equal, 1));
        }
        let mut backward = Filters::new();
        for field in picks.iter().rev() {
            backward.insert(*field, Filter::new(Op::Equal, 1));
        }

        let a = schema.filter_clause(&forward, first).unwrap();
        let b = schema.filter_clause(&backward, first).unwrap();
        prop_assert_eq!(&a, &b);

        let last = format!("${}", first + picks.len() - 1);
        prop_assert!(a.ends_with(&last));
        prop_assert_eq!(a.matches('$').count(), picks.len());
    }
}
