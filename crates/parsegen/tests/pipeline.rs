use parsegen::{
    analysis::{check_ll1, FirstSets, FollowSets},
    engine::{LlParser, LrParser},
    grammar::{Grammar, SymbolID, TerminalID, ValidateError},
    table::{Conflict, LlTable, LrTable, TableError},
    token::tokens,
    transform::{left_factor, remove_left_recursion},
};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn expression_grammar() -> Grammar {
    Grammar::from_str(
        "E -> E plus T | T ;
         T -> T star F | F ;
         F -> lparen E rparen | id ;",
    )
    .unwrap()
}

const EXPRESSION_TREE: &str = "(E (E (T (T (F id)) star (F id))) plus (T (F id)))";

#[test]
fn epsilon_in_first_iff_nullable() {
    init_tracing();
    let g = Grammar::from_str(
        "S -> A B c ;
         A -> a | ε ;
         B -> A A ;",
    )
    .unwrap();
    let first = FirstSets::new(&g);

    for (name, nullable) in [("A", true), ("B", true), ("S", false)] {
        let n = g.nonterminal_by_name(name).unwrap();
        assert_eq!(first.nullable(n), nullable, "nullability of {}", name);
    }
    // terminals never derive the empty string
    let a = g.terminal_by_name("a").unwrap();
    assert!(!first.nullable_symbol(SymbolID::T(a)));
}

#[test]
fn follow_of_start_contains_eoi() {
    init_tracing();
    let g = expression_grammar();
    let first = FirstSets::new(&g);
    let follow = FollowSets::new(&g, &first);
    assert!(follow.follow(g.start_symbol).contains(TerminalID::EOI));
}

#[test]
fn check_ll1_agrees_with_table_construction() {
    init_tracing();
    let ll = Grammar::from_str(
        "E -> T E_TAIL ;
         E_TAIL -> plus T E_TAIL | ε ;
         T -> F T_TAIL ;
         T_TAIL -> star F T_TAIL | ε ;
         F -> lparen E rparen | id ;",
    )
    .unwrap();
    let first = FirstSets::new(&ll);
    let follow = FollowSets::new(&ll, &first);
    assert!(check_ll1(&ll, &first, &follow).is_ok());
    assert!(LlTable::build(&ll).is_ok());

    let not_ll = expression_grammar();
    let first = FirstSets::new(&not_ll);
    let follow = FollowSets::new(&not_ll, &first);
    assert!(check_ll1(&not_ll, &first, &follow).is_err());
    assert!(matches!(
        LlTable::build(&not_ll),
        Err(TableError::NotLl1(..))
    ));
}

#[test]
fn all_lr_flavors_build_the_same_expression_tree() {
    init_tracing();
    let g = expression_grammar();
    for parser in [
        LrParser::slr(&g, false).unwrap(),
        LrParser::clr(&g, false).unwrap(),
        LrParser::lalr(&g, false).unwrap(),
    ] {
        let tree = parser.parse(&mut tokens("id star id plus id")).unwrap();
        assert_eq!(tree.sexp(), EXPRESSION_TREE);
        assert!(parser.warnings().is_empty());
    }
}

#[test]
fn clr_and_lalr_differ_in_states_but_agree_in_behavior() {
    init_tracing();
    let g = Grammar::from_str(
        "S -> C C ;
         C -> c C | d ;",
    )
    .unwrap();

    let clr = LrParser::clr(&g, false).unwrap();
    let lalr = LrParser::lalr(&g, false).unwrap();
    assert_eq!(clr.table().states().count(), 10);
    assert_eq!(lalr.table().states().count(), 7);

    for source in ["d d", "c d d", "c c d c d", "d c c d"] {
        let left = clr.parse(&mut tokens(source)).unwrap();
        let right = lalr.parse(&mut tokens(source)).unwrap();
        assert_eq!(left.sexp(), right.sexp(), "differs on `{}'", source);
    }
    for source in ["", "d", "c c", "d d d"] {
        assert!(clr.parse(&mut tokens(source)).is_err(), "`{}'", source);
        assert!(lalr.parse(&mut tokens(source)).is_err(), "`{}'", source);
    }
}

#[test]
fn reduce_reduce_always_rejects_shift_reduce_warns_once() {
    init_tracing();
    let rr = Grammar::from_str(
        "S -> A | B ;
         A -> a ;
         B -> a ;",
    )
    .unwrap();
    let builders: [fn(&Grammar, bool) -> Result<LrTable, TableError>; 3] =
        [LrTable::slr, LrTable::clr, LrTable::lalr];
    for build in builders {
        assert!(build(&rr, true).is_err());
    }

    let sr = Grammar::from_str("E -> E plus E | id ;").unwrap();
    assert!(matches!(
        LrTable::lalr(&sr, false),
        Err(TableError::NotLalr1 {
            conflict: Conflict::ShiftReduce { .. },
            ..
        })
    ));
    let table = LrTable::lalr(&sr, true).unwrap();
    assert_eq!(table.warnings().len(), 1);
}

#[test]
fn left_recursion_elimination_preserves_the_language() {
    init_tracing();
    let g = Grammar::from_str("S -> S a b | S a c | d ;").unwrap();
    let factored = left_factor(&remove_left_recursion(&g));

    // drive the original with LALR and the transformed with LL(1); both
    // must accept and reject the same corpus
    let lr = LrParser::lalr(&g, false).unwrap();
    let ll = LlParser::new(&factored).unwrap();

    let accepted = ["d", "d a b", "d a c", "d a b a c", "d a c a c a b"];
    for source in accepted {
        assert!(lr.parse(&mut tokens(source)).is_ok(), "`{}'", source);
        assert!(ll.parse(&mut tokens(source)).is_ok(), "`{}'", source);
    }

    let rejected = ["", "a b", "d a", "d b", "d a b c", "d d"];
    for source in rejected {
        assert!(lr.parse(&mut tokens(source)).is_err(), "`{}'", source);
        assert!(ll.parse(&mut tokens(source)).is_err(), "`{}'", source);
    }
}

#[test]
fn table_rendering_round_trips() {
    init_tracing();
    let g = expression_grammar();
    let first = LrTable::lalr(&g, false).unwrap().display(&g).to_string();
    let second = LrTable::lalr(&g, false).unwrap().display(&g).to_string();
    assert_eq!(first, second);

    let ll = Grammar::from_str(
        "S -> a S b | ε ;",
    )
    .unwrap();
    let first = LlTable::build(&ll).unwrap().display(&ll).to_string();
    let second = LlTable::build(&ll).unwrap().display(&ll).to_string();
    assert_eq!(first, second);
}

#[test]
fn validation_names_the_missing_nonterminal_and_its_producer() {
    init_tracing();
    let g = Grammar::define(|def| {
        let a = def.terminal("a", parsegen::grammar::TokenClass::from_id("a"))?;
        let s = def.nonterminal("S")?;
        let dangling = def.nonterminal("DANGLING")?;
        def.rule(s, [SymbolID::T(a), SymbolID::N(dangling)])?;
        def.start_symbol(s);
        Ok(())
    })
    .unwrap();

    let err = g.validate().unwrap_err();
    match err {
        ValidateError::MissingRule { nonterminal, producer } => {
            assert_eq!(nonterminal, "DANGLING");
            assert_eq!(producer, "S");
        }
        other => panic!("unexpected validation error: {}", other),
    }
}
