use shellcalc::config::Settings;
use shellcalc::error::{CalcError, EvalError};
use shellcalc::preprocess::Substitution;
use shellcalc::{Reply, Session};

fn say(session: &mut Session, line: &str) -> String {
    session.handle_line(line).render().unwrap_or_default()
}

#[test]
fn history_is_insertion_ordered() {
    let mut session = Session::default();
    session.evaluate("1+2").unwrap();
    session.evaluate("2 * 2").unwrap();
    assert_eq!(say(&mut session, "history"), "1+2 = 3.0\n2 * 2 = 4.0");

    session.evaluate("1+2").unwrap();
    assert_eq!(session.environment().history_len(), 2);
    assert_eq!(say(&mut session, "history"), "1+2 = 3.0\n2 * 2 = 4.0");
}

#[test]
fn previous_line() {
    let mut session = Session::default();
    assert_eq!(session.previous(false), "");
    assert_eq!(session.previous(true), "");

    session.evaluate("1+2").unwrap();
    session.evaluate("2 * 2").unwrap();
    session.evaluate("10/5").unwrap();
    assert_eq!(session.previous(false), "10/5");
    assert_eq!(session.previous(true), "10/5 = 2.0");
}

#[test]
fn answer_is_set_and_reused() {
    let mut session = Session::default();
    assert_eq!(session.environment().answer(), None);
    session.evaluate("6*7").unwrap();
    assert_eq!(session.environment().answer(), Some(42.0));
    assert_eq!(session.evaluate("ans/2"), Ok(21.0));
}

#[test]
fn failures_leave_environment_untouched() {
    let mut session = Session::default();
    session.evaluate("3+4").unwrap();

    assert_eq!(
        session.evaluate("1/0"),
        Err(CalcError::Eval(EvalError::DivisionByZero))
    );
    assert_eq!(
        session.evaluate("1%0"),
        Err(CalcError::Eval(EvalError::DivisionByZero))
    );
    assert!(session.evaluate("2+").is_err());

    assert_eq!(session.environment().answer(), Some(7.0));
    assert_eq!(session.environment().history_text(), "3+4 = 7.0");
}

#[test]
fn variables_through_commands() {
    let mut session = Session::default();
    assert_eq!(say(&mut session, "var ten = 10"), "ten set to 10");
    assert_eq!(say(&mut session, "var five = 5"), "five set to 5");
    assert_eq!(say(&mut session, "variables"), "five = 5\nten = 10");
    assert_eq!(say(&mut session, "five^2"), "= 25.0");
    assert_eq!(say(&mut session, "ten / five"), "= 2.0");
}

#[test]
fn reserved_names_cannot_be_variables() {
    let mut session = Session::default();
    assert_eq!(say(&mut session, "var help = 5"), "Error: Cannot overwrite command");
    assert_eq!(say(&mut session, "var pi = 3.14"), "Error: Cannot overwrite constant");
    assert_eq!(say(&mut session, "var 5 = 5"), "Error: Variable must begin with a letter");
    assert_eq!(say(&mut session, "var x = abc"), "Error: Value must be an integer or decimal");
    assert_eq!(say(&mut session, "variables"), "");
    assert_eq!(say(&mut session, "help"), Session::banner());
    assert!(say(&mut session, "constants").contains("pi = 3.141592653589793"));
}

#[test]
fn constants_listing_tracks_answer() {
    let mut session = Session::default();
    assert!(say(&mut session, "constants").starts_with("ans = undefined\n"));
    session.evaluate("2^10").unwrap();
    assert!(say(&mut session, "constants").starts_with("ans = 1024.0\n"));
}

#[test]
fn errors_render_with_prefix() {
    let mut session = Session::default();
    assert_eq!(say(&mut session, "(1+2"), "Error: missing parenthesis");
    assert_eq!(say(&mut session, "x+1"), "Error: invalid identifier 'x'");
    assert!(matches!(session.handle_line("1/0"), Reply::Error(_)));
}

#[test]
fn token_substitution_setting() {
    let settings = Settings {
        substitution: Substitution::Token,
        show_steps: false,
    };
    let mut session = Session::new(settings);
    session.handle_line("var a = 1");
    session.handle_line("var ab = 2");
    assert_eq!(session.evaluate("a+ab"), Ok(3.0));

    let mut textual = Session::default();
    textual.handle_line("var a = 1");
    textual.handle_line("var ab = 2");
    assert!(textual.evaluate("a+ab").is_err());
}

#[test]
fn overflowing_literal_leaves_answer_and_history() {
    let mut session = Session::default();
    session.evaluate("1+1").unwrap();

    let huge = "9".repeat(400);
    assert!(matches!(
        session.evaluate(&huge),
        Err(CalcError::Eval(EvalError::InvalidOperation(_)))
    ));
    assert!(matches!(
        session.evaluate(&format!("-{}", huge)),
        Err(CalcError::Eval(EvalError::InvalidOperation(_)))
    ));

    assert_eq!(session.environment().answer(), Some(2.0));
    assert_eq!(session.environment().history_text(), "1+1 = 2.0");
    assert_eq!(session.evaluate("ans+1"), Ok(3.0));
}

#[test]
fn history_key_is_the_trimmed_line() {
    let mut session = Session::default();
    session.handle_line("   4 / 2  \n");
    session.handle_line("4 / 2");
    assert_eq!(session.environment().history_text(), "4 / 2 = 2.0");
    assert_eq!(session.previous(false), "4 / 2");
}
