//! Tests for query evaluation.

use super::*;
use crate::compile;

// ==================== Test Helpers ====================

fn make_user(id: i64, screen_name: &str) -> User {
    User::new(id, screen_name)
}

fn make_status(id: i64, author: User, text: &str) -> Status {
    Status::new(id, author, text)
}

fn make_accounts() -> Vec<Account> {
    let mut me = Account::new(1, "Me");
    me.following.insert(2);
    me.followers.insert(3);
    me.blocking.insert(4);

    let mut alt = Account::new(10, "alt");
    alt.following.insert(5);
    alt.muting.insert(3);

    vec![me, alt]
}

fn make_lists() -> Vec<TwitterList> {
    vec![TwitterList::new("Me", "Friends", [2, 5])]
}

fn predicate(query: &str) -> Predicate {
    compile(query)
        .unwrap()
        .get_evaluator()
        .unwrap_or_else(|e| panic!("building evaluator for {query:?} failed: {e}"))
}

/// Evaluates `query` against `status` with the default accounts and lists.
fn eval(query: &str, status: &Status) -> bool {
    let accounts = make_accounts();
    let lists = make_lists();
    let context = FilterContext::new(&accounts, &lists);
    predicate(query).matches(status, &context)
}

fn build_error(query: &str) -> QueryErrorKind {
    compile(query)
        .unwrap()
        .get_evaluator()
        .unwrap_err()
        .kind()
        .clone()
}

fn plain() -> Status {
    make_status(100, make_user(2, "friend"), "Hello World")
}

fn retweet() -> Status {
    let mut original = make_status(100, make_user(2, "friend"), "original text");
    original.source = "web".to_string();
    let mut status = Status::retweet(200, make_user(3, "Booster"), original);
    status.text = "RT @friend: original text".to_string();
    status
}

// ==================== Arithmetic ====================

#[test]
fn test_precedence_evaluates_to_seven() {
    assert!(eval("1 + 2 * 3 == 7", &plain()));
    assert!(!eval("1 + 2 * 3 == 9", &plain()));
}

#[test]
fn test_right_associative_subtraction() {
    assert!(eval("10 - 3 - 2 == 9", &plain()));
    assert!(!eval("10 - 3 - 2 == 5", &plain()));
}

#[test]
fn test_division_by_zero_yields_zero() {
    assert!(eval("10 / 0 == 0", &plain()));
    assert!(eval("7 / 2 == 3", &plain()));
}

#[test]
fn test_arithmetic_wraps() {
    assert!(eval("9223372036854775807 + 1 < 0", &plain()));
}

#[test]
fn test_negation() {
    assert!(eval("-3 + 5 == 2", &plain()));
    assert!(eval("retweeter.id == -1", &plain()));
}

#[test]
fn test_string_concatenation() {
    assert!(eval("user.screen_name + \"!\" == \"friend!\"", &plain()));
}

#[test]
fn test_relational_operators() {
    let mut author = make_user(2, "friend");
    author.followers_count = 150;
    let status = make_status(1, author, "");

    assert!(eval("user.followers > 100", &status));
    assert!(eval("user.followers >= 150", &status));
    assert!(eval("user.followers <= 150", &status));
    assert!(!eval("user.followers < 150", &status));
}

// ==================== Boolean Logic ====================

#[test]
fn test_empty_query_matches_everything() {
    assert!(eval("from home", &plain()));
    assert!(eval("from home", &retweet()));
}

#[test]
fn test_empty_bracket_is_vacuous_true() {
    assert!(eval("where ()", &plain()));
    assert!(eval("where () & !rt", &plain()));
    assert!(!eval("where !()", &plain()));
}

#[test]
fn test_end_to_end_verified_and_not_retweet() {
    let query = "from home, mentions where user.verified & !rt";

    let mut verified = make_user(2, "friend");
    verified.is_verified = true;
    assert!(eval(query, &make_status(1, verified.clone(), "hi")));
    assert!(!eval(query, &make_status(2, make_user(3, "nobody"), "hi")));

    let rt = Status::retweet(3, make_user(4, "other"), make_status(1, verified, "hi"));
    assert!(!eval(query, &rt));
}

#[test]
fn test_boolean_equality() {
    assert!(eval("rt == dm", &plain()));
    assert!(eval("rt != user.verified", &retweet()));
}

// ==================== Strings ====================

#[test]
fn test_string_equality_ignores_case() {
    assert!(eval("text == \"hello world\"", &plain()));
    assert!(eval("user.screen_name == \"FRIEND\"", &plain()));
}

#[test]
fn test_caseful_makes_comparison_case_sensitive() {
    assert!(!eval("caseful text == \"hello world\"", &plain()));
    assert!(!eval("text == caseful \"hello world\"", &plain()));
    assert!(eval("caseful text == \"Hello World\"", &plain()));
}

#[test]
fn test_caseful_applies_to_enclosed_expressions() {
    assert!(!eval("caseful (text startswith \"hello\")", &plain()));
    assert!(eval("caseful (text startswith \"Hello\")", &plain()));
}

#[test]
fn test_caseful_inside_an_operand_applies_to_the_comparison() {
    assert!(!eval("caseful text + \"\" == \"HELLO WORLD\"", &plain()));
    assert!(eval("caseful text + \"\" == \"Hello World\"", &plain()));
    assert!(!eval("\"hello world\" == \"\" + caseful text", &plain()));
    assert!(!eval("(caseful text + \"!\") contains \"WORLD!\"", &plain()));
    assert!(eval("text + \"\" == \"HELLO WORLD\"", &plain()));
}

#[test]
fn test_substring_and_affixes() {
    assert!(eval("text contains \"WORLD\"", &plain()));
    assert!(eval("\"o w\" in text", &plain()));
    assert!(eval("text startswith \"hel\"", &plain()));
    assert!(eval("text endswith \"LD\"", &plain()));
    assert!(!eval("text endswith \"hello\"", &plain()));
}

#[test]
fn test_literal_regex() {
    assert!(eval("text match \"^hello\\\\s+w\"", &plain()));
    assert!(!eval("caseful text match \"^hello\"", &plain()));
    assert!(eval("text regex \"o.w\"", &plain()));
}

#[test]
fn test_invalid_literal_regex_fails_build() {
    assert!(matches!(
        build_error("where text match \"[\""),
        QueryErrorKind::InvalidRegex { .. }
    ));
}

#[test]
fn test_dynamic_regex() {
    let mut author = make_user(2, "friend");
    author.description = "^hello".to_string();
    assert!(eval("text match user.bio", &make_status(1, author.clone(), "hello there")));

    author.description = "[".to_string();
    assert!(!eval("text match user.bio", &make_status(1, author, "[")));
}

// ==================== Status Fields ====================

#[test]
fn test_retweet_reads_original() {
    let status = retweet();
    assert!(eval("rt", &status));
    assert!(eval("text == \"original text\"", &status));
    assert!(eval("via == \"web\"", &status));
    assert!(eval("id == 200", &status));
    assert!(eval("user.screen_name == \"friend\"", &status));
    assert!(eval("retweeter.screen_name == \"booster\"", &status));
    assert!(eval("retweeter == 3", &status));
}

#[test]
fn test_absent_retweeter_defaults() {
    let status = plain();
    assert!(!eval("retweeter.verified", &status));
    assert!(eval("retweeter.followers == -1", &status));
    assert!(eval("retweeter.name == \"\"", &status));
    assert!(!eval("retweeter == user", &status));
    assert!(!eval("retweeter <- our.following", &status));
}

#[test]
fn test_in_reply_to() {
    let mut status = plain();
    assert!(eval("in_reply_to == -1", &status));
    status.in_reply_to_user_id = Some(1);
    assert!(eval("in_reply_to == 1", &status));
    assert!(eval("reply_to == @me", &status));
}

#[test]
fn test_direct_message_and_mentions() {
    let dm = Status::direct_message(5, make_user(2, "friend"), make_user(1, "Me"), "psst");
    assert!(eval("dm", &dm));
    assert!(eval("mentions -> @me", &dm));
    assert!(eval("our in to", &dm));
    assert!(!eval("dm", &plain()));
}

#[test]
fn test_mentions_contains_id() {
    let mut status = plain();
    status.mention_ids = vec![1, 7];
    assert!(eval("mentions -> 7", &status));
    assert!(eval("mentions == [7, 1]", &status));
    assert!(!eval("mentions -> 8", &status));
}

#[test]
fn test_favoriters_and_retweeters() {
    let mut status = plain();
    status.favoriter_ids = vec![1];
    status.retweeter_ids = vec![3, 10];
    assert!(eval("favs -> our", &status));
    assert!(eval("retweeters -> #10", &status));
    assert!(!eval("retweeters -> @me", &status));
}

#[test]
fn test_has_media() {
    let mut status = plain();
    assert!(!eval("media", &status));
    status.media.push(timeline_model_rs::Media {
        url: "https://example.com/a.png".to_string(),
        kind: timeline_model_rs::MediaKind::Photo,
    });
    assert!(eval("has_media", &status));
}

// ==================== Accounts, Relations, Lists ====================

#[test]
fn test_user_matches_account() {
    let mine = make_status(1, make_user(1, "Me"), "");
    assert!(eval("user == @me", &mine));
    assert!(eval("user == our", &mine));
    assert!(eval("user == #1", &mine));
    assert!(eval("user == 1", &mine));
    assert!(eval("1 == user", &mine));
    assert!(!eval("user == @alt", &mine));
}

#[test]
fn test_unknown_account_is_empty() {
    let status = plain();
    assert!(!eval("user == @nobody", &status));
    assert!(!eval("user <- @nobody.following", &status));
}

#[test]
fn test_relations() {
    assert!(eval("user <- our.following", &plain()));
    assert!(eval("user in @ME.friends", &plain()));
    assert!(!eval("user <- @me.followers", &plain()));

    let blocked = make_status(1, make_user(4, "troll"), "");
    assert!(eval("user <- our.blocking", &blocked));

    let followed_by_alt = make_status(1, make_user(5, "x"), "");
    assert!(eval("user <- our.following", &followed_by_alt));
    assert!(!eval("user <- @me.following", &followed_by_alt));
}

#[test]
fn test_list_members() {
    assert!(eval("user <- list.me.friends", &plain()));
    assert!(eval("list.\"ME\".\"FRIENDS\" -> user", &plain()));
    assert!(!eval("user <- list.me.enemies", &plain()));
}

#[test]
fn test_set_literals() {
    assert!(eval("user <- [1, 2]", &plain()));
    assert!(eval("[1, 2, 3] -> [3, 1]", &plain()));
    assert!(!eval("[1, 2] -> [3]", &plain()));
    assert!(eval("[@me, user] == [1, 2]", &plain()));
    assert!(eval("[user.id] -> 2", &plain()));
    assert!(!eval("user <- []", &plain()));
}

#[test]
fn test_mute_checks_every_local_account() {
    let muted = make_status(300, make_user(3, "noisy"), "hello");
    assert!(eval("mute", &muted));
    assert!(!eval("mute", &plain()));
    assert!(eval("user <- @alt.muting", &muted));
    assert!(!eval("user <- @Me.muted", &muted));
}

#[test]
fn test_mute_ignores_the_retweeter() {
    // retweet() is boosted by id 3, whom alt mutes; the author is id 2.
    assert!(!eval("mute", &retweet()));
    assert!(eval("retweeter <- our.mutes", &retweet()));
}

// ==================== Type Errors ====================

#[test]
fn test_adding_users_is_a_type_error() {
    assert_eq!(
        build_error("where user + user"),
        QueryErrorKind::TypeMismatch {
            operator: "+".to_string(),
            left: "user".to_string(),
            right: "user".to_string(),
        }
    );
}

#[test]
fn test_comparing_strings_is_a_type_error() {
    assert!(matches!(
        build_error("where text < \"b\""),
        QueryErrorKind::TypeMismatch { .. }
    ));
    assert!(matches!(
        build_error("where rt & 1"),
        QueryErrorKind::TypeMismatch { .. }
    ));
    assert!(matches!(
        build_error("where text -> 1"),
        QueryErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_root_must_be_boolean() {
    assert_eq!(
        build_error("where 1 + 2"),
        QueryErrorKind::WrongType {
            expected: "boolean".to_string(),
            found: "numeric".to_string(),
        }
    );
    assert!(matches!(build_error("where text"), QueryErrorKind::WrongType { .. }));
}

#[test]
fn test_unary_operand_types() {
    assert_eq!(
        build_error("where !1"),
        QueryErrorKind::WrongType {
            expected: "boolean".to_string(),
            found: "numeric".to_string(),
        }
    );
    assert!(matches!(build_error("where -rt"), QueryErrorKind::WrongType { .. }));
}

#[test]
fn test_string_in_set_literal_fails() {
    assert_eq!(
        build_error("where [1, \"a\"] -> 1"),
        QueryErrorKind::InvalidSetMember {
            member: "\"a\"".to_string()
        }
    );
}

// ==================== Context and Predicate ====================

#[test]
fn test_context_lookup_ignores_case() {
    let accounts = make_accounts();
    let lists = make_lists();
    let context = FilterContext::new(&accounts, &lists);

    assert_eq!(context.find_account_by_screen_name("ME").map(|a| a.user_id), Some(1));
    assert_eq!(context.find_account_by_id(10).map(|a| a.screen_name.as_str()), Some("alt"));
    assert_eq!(context.select_accounts(&AccountSelector::Any).len(), 2);
    assert!(context.select_accounts(&AccountSelector::Id(99)).is_empty());
    assert!(context.list_members("me", "friends").is_some_and(|m| m.contains(&5)));
}

#[test]
fn test_empty_context() {
    let context = FilterContext::default();
    assert!(!predicate("user == our").matches(&plain(), &context));
    assert!(predicate("!(user <- our.following)").matches(&plain(), &context));
}

#[test]
fn test_filter_statuses() {
    let accounts = make_accounts();
    let context = FilterContext::new(&accounts, &[]);
    let statuses = vec![
        plain(),
        retweet(),
        make_status(300, make_user(9, "stranger"), "x"),
    ];

    let matched = predicate("user <- our.following").filter_statuses(&statuses, &context);
    let ids: Vec<_> = matched.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![100, 200]);
}

#[test]
fn test_predicate_clone_shares_closure() {
    let first = predicate("rt");
    let second = first.clone();
    let context = FilterContext::default();
    assert_eq!(
        first.matches(&retweet(), &context),
        second.matches(&retweet(), &context)
    );
    assert!(format!("{first:?}").starts_with("Predicate"));
}
