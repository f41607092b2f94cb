// Movie database integration tests
//
// End to end: build tables through insert, then compose operators.

use relalg_core::{IndexKind, JoinStrategy, RelError, Table, Value, tuple};

// ─── Helpers ────────────────────────────────────────────

const MOVIE_ATTRS: &str = "title year length genre studioName producerNo";
const MOVIE_DOMAINS: &str = "String Integer Integer String String Integer";
const MOVIE_KEY: &str = "title year";

fn movie(index: IndexKind) -> Table {
    let mut t = Table::with_index("movie", MOVIE_ATTRS, MOVIE_DOMAINS, MOVIE_KEY, index).unwrap();
    t.insert(tuple!["Star_Wars", 1977, 124, "sciFi", "Fox", 12345]).unwrap();
    t.insert(tuple!["Star_Wars_2", 1980, 124, "sciFi", "Fox", 12345]).unwrap();
    t.insert(tuple!["Rocky", 1985, 200, "action", "Universal", 12125]).unwrap();
    t.insert(tuple!["Rambo", 1978, 100, "action", "Universal", 32355]).unwrap();
    t
}

fn cinema(index: IndexKind) -> Table {
    let mut t = Table::with_index("cinema", MOVIE_ATTRS, MOVIE_DOMAINS, MOVIE_KEY, index).unwrap();
    t.insert(tuple!["Rocky", 1985, 200, "action", "Universal", 12125]).unwrap();
    t.insert(tuple!["Rambo", 1978, 100, "action", "Universal", 32355]).unwrap();
    t.insert(tuple!["Galaxy_Quest", 1999, 104, "comedy", "DreamWorks", 67890]).unwrap();
    t
}

fn studio() -> Table {
    let mut t = Table::new("studio", "name address presNo", "String String Integer", "name").unwrap();
    t.insert(tuple!["Fox", "Los_Angeles", 7777]).unwrap();
    t.insert(tuple!["Universal", "Universal_City", 8888]).unwrap();
    t.insert(tuple!["DreamWorks", "Universal_City", 9999]).unwrap();
    t
}

fn movie_exec() -> Table {
    let mut t = Table::new("movieExec", "certNo name address fee", "Integer String String Double", "certNo").unwrap();
    t.insert(tuple![12345, "George_Lucas", "Oak_St", 1234.00]).unwrap();
    t.insert(tuple![12125, "Irwin_Winkler", "Maple_St", 9999.99]).unwrap();
    t.insert(tuple![32355, "Buzz_Feitshans", "Pine_St", 5678.50]).unwrap();
    t
}

fn titles(table: &Table) -> Vec<String> {
    let col = table.col("title").unwrap();
    table.tuples().iter().map(|t| t[col].to_string()).collect()
}

// ─── Scenario ───────────────────────────────────────────

#[test]
fn test_select_year_1977() {
    for kind in [IndexKind::None, IndexKind::Ordered, IndexKind::Hash] {
        let m = movie(kind);
        let year = m.col("year").unwrap();
        let r = m.select(|t| t[year] == Value::Integer(1977));
        assert_eq!(r.tuples(), [tuple!["Star_Wars", 1977, 124, "sciFi", "Fox", 12345]]);
    }
}

#[test]
fn test_union_movie_cinema() {
    let u = movie(IndexKind::Hash).union(&cinema(IndexKind::Hash)).unwrap();
    assert_eq!(u.len(), 5);
    assert_eq!(
        titles(&u),
        ["Star_Wars", "Star_Wars_2", "Rocky", "Rambo", "Galaxy_Quest"]
    );
    assert!(u.key_unique());
}

#[test]
fn test_union_sharing_a_key_is_flagged_for_every_index() {
    for kind in [IndexKind::None, IndexKind::Ordered, IndexKind::Hash] {
        let mut a = Table::with_index("a", "id tag", "Integer String", "id", kind).unwrap();
        a.insert(tuple![1, "x"]).unwrap();
        let mut b = Table::with_index("b", "id tag", "Integer String", "id", kind).unwrap();
        b.insert(tuple![1, "y"]).unwrap();

        let u = a.union(&b).unwrap();
        assert_eq!(u.len(), 2, "{kind}");
        assert!(!u.key_unique(), "{kind}");
    }
}

#[test]
fn test_minus_movie_cinema() {
    let d = movie(IndexKind::None).minus(&cinema(IndexKind::None)).unwrap();
    assert_eq!(titles(&d), ["Star_Wars", "Star_Wars_2"]);
}

#[test]
fn test_project_title_year() {
    let m = movie(IndexKind::None);
    let p = m.project("title year").unwrap();
    assert_eq!(p.len(), 4);
    assert_eq!(p.attributes(), ["title", "year"]);
    assert_eq!(p.schema().key(), m.schema().key());
    assert_eq!(p.tuples()[3], tuple!["Rambo", 1978]);
}

// ─── Composition ────────────────────────────────────────

#[test]
fn test_join_then_project() {
    let j = movie(IndexKind::None).join("studioName", "name", &studio()).unwrap();
    assert_eq!(j.len(), 4);
    assert_eq!(j.schema().arity(), 9);

    let p = j.project("title address").unwrap();
    assert_eq!(p.tuples()[0], tuple!["Star_Wars", "Los_Angeles"]);
    assert_eq!(p.tuples()[2], tuple!["Rocky", "Universal_City"]);
}

#[test]
fn test_join_producer_disambiguates_shared_names() {
    let m = movie(IndexKind::None);
    let exec = movie_exec();
    let j = m.join("producerNo", "certNo", &exec).unwrap();
    // `name` and `address` are new here, so nothing gets renamed.
    assert_eq!(j.schema().arity(), 10);
    assert_eq!(j.len(), 4);

    let j2 = j.join("studioName", "name", &studio()).unwrap();
    assert!(j2.col("name2").is_some());
    assert!(j2.col("address2").is_some());
    assert_eq!(j2.len(), 4);
}

#[test]
fn test_join_strategies_match_on_scenario() {
    relalg_core::logging::init_test();
    let m = movie(IndexKind::None);
    let c = cinema(IndexKind::Hash);
    let expected = m.join("title year", "title year", &c).unwrap();
    assert_eq!(expected.len(), 2);
    for strategy in [JoinStrategy::Index, JoinStrategy::Hash] {
        let r = m.join_with(strategy, "title year", "title year", &c).unwrap();
        assert_eq!(r.tuples(), expected.tuples(), "{strategy:?}");
    }
    // Key order reversed on the right still reaches the index.
    let r = m.index_join("year title", "year title", &c).unwrap();
    assert_eq!(r.tuples(), expected.tuples());
}

#[test]
fn test_natural_join_movie_cinema() {
    let m = movie(IndexKind::None);
    let c = cinema(IndexKind::None);
    let n = m.natural_join(&c).unwrap();
    assert_eq!(n.attributes(), m.attributes());
    assert_eq!(titles(&n), ["Rocky", "Rambo"]);
}

#[test]
fn test_natural_join_studio_after_rename() {
    let mut owns = Table::new("owns", "studioName presNo", "String Integer", "studioName").unwrap();
    owns.insert(tuple!["Fox", 7777]).unwrap();
    owns.insert(tuple!["Universal", 1]).unwrap();

    let n = movie(IndexKind::None).natural_join(&owns).unwrap();
    // Common: studioName; producerNo/presNo differ by name.
    assert_eq!(n.schema().arity(), 7);
    assert_eq!(n.len(), 4);
}

#[test]
fn test_operator_errors_yield_no_table() {
    let m = movie(IndexKind::None);
    let s = studio();
    assert!(matches!(m.union(&s), Err(RelError::SchemaMismatch(_))));
    assert!(matches!(m.minus(&s), Err(RelError::SchemaMismatch(_))));
    assert!(matches!(
        m.join("studioName year", "name", &s),
        Err(RelError::ArityMismatch { .. })
    ));
    assert!(matches!(
        m.join("studio", "name", &s),
        Err(RelError::AttributeNotFound(_))
    ));
}

#[test]
fn test_rejected_inserts_leave_table_unchanged() {
    let mut m = movie(IndexKind::Ordered);
    assert!(matches!(
        m.insert(tuple!["Alien", 1979]),
        Err(RelError::ArityMismatch { .. })
    ));
    assert!(matches!(
        m.insert(tuple!["Alien", "1979", 117, "horror", "Fox", 1]),
        Err(RelError::TypeMismatch { .. })
    ));
    assert!(matches!(
        m.insert(tuple!["Rocky", 1985, 1, "drama", "Fox", 1]),
        Err(RelError::DuplicateKey { .. })
    ));
    assert_eq!(m.len(), 4);

    // Same title, different year is a different key.
    m.insert(tuple!["Rocky", 1976, 119, "drama", "United_Artists", 1]).unwrap();
    assert_eq!(m.len(), 5);
}

#[test]
fn test_render_scenario() {
    let text = movie(IndexKind::None).project("title year").unwrap().render().unwrap();
    assert!(text.contains("Star_Wars_2"));
    assert!(text.contains("| title"));
}
