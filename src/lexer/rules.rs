//! デフォルトモードの字句規則
//!
//! 規則は定義順に試し、最初に一致したものを採用する（最長一致ではない）。
//! 先読みが必要な規則があるため、nomの`alt`で順序付きに組み立てる。

use super::token::{TokenKind, TokenValue};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{
        alpha1, char, digit0, digit1, hex_digit1, not_line_ending, oct_digit1, one_of, satisfy,
    },
    combinator::{map, not, opt, peek, recognize},
    error::{Error, ErrorKind},
    multi::many1_count,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

/// 文字列の区切り
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
}

/// デフォルトモードの規則が認識した字句
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme<'a> {
    Token(TokenKind, TokenValue),
    /// 名前。キーワード表で分類される
    Name(&'a str),
    Number(&'a str),
    Regex { pattern: &'a str, insensitive: bool },
    Whitespace(&'a str),
    /// 連続した改行（個数）
    Newlines(usize),
    /// `\`+改行。行番号だけ進める
    Continuation,
    /// コメント
    Skip,
    StringStart { quote: Quote, triple: bool },
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// 単語の途中で終わっていないこと
fn word_end(input: &str) -> IResult<&str, ()> {
    not(peek(satisfy(is_word_char)))(input)
}

/// 直後が空白であること（消費しない）
fn before_space(input: &str) -> IResult<&str, char> {
    peek(satisfy(char::is_whitespace))(input)
}

/// 複数語キーワードの区切り（空白1文字、改行は含まない）
fn separator(input: &str) -> IResult<&str, char> {
    one_of(" \t")(input)
}

/// `word`の後に空白が続くときだけ一致する
fn spaced<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(word), before_space)
}

fn token<'a>(kind: TokenKind, value: &str) -> Lexeme<'a> {
    Lexeme::Token(kind, TokenValue::text(value))
}

fn boolean(input: &str) -> IResult<&str, Lexeme> {
    map(alt((spaced("true"), spaced("false"))), |word| {
        Lexeme::Token(TokenKind::Boolean, TokenValue::Boolean(word == "true"))
    })(input)
}

/// `/pattern/`と任意の`i`フラグ。パターンは空白を含まず、最後の`/`までを取る
fn regex(input: &str) -> IResult<&str, Lexeme> {
    let (rest, _) = char('/')(input)?;
    let run = rest
        .find(char::is_whitespace)
        .map_or(rest, |end| &rest[..end]);

    match run.rfind('/') {
        Some(end) if end > 0 => {
            let pattern = &rest[..end];
            let (rest, flag) = opt(char('i'))(&rest[end + 1..])?;
            Ok((
                rest,
                Lexeme::Regex {
                    pattern,
                    insensitive: flag.is_some(),
                },
            ))
        }
        _ => Err(nom::Err::Error(Error::new(input, ErrorKind::Verify))),
    }
}

fn number_of(input: &str) -> IResult<&str, Lexeme> {
    map(tuple((tag("number"), separator, tag("of"), word_end)), |_| {
        token(TokenKind::NumberOf, "count")
    })(input)
}

fn kwarg(input: &str) -> IResult<&str, Lexeme> {
    map(
        recognize(pair(
            tag("--"),
            take_while1(|c: char| c.is_ascii_lowercase() || c == '_'),
        )),
        |text| token(TokenKind::Kwarg, text),
    )(input)
}

/// 省略可能な`is `
fn optional_is(input: &str) -> IResult<&str, Option<(&str, char)>> {
    opt(pair(tag("is"), separator))(input)
}

/// 省略可能な` to`
fn optional_to(input: &str) -> IResult<&str, Option<(char, &str, ())>> {
    opt(tuple((separator, tag("to"), word_end)))(input)
}

fn equal(input: &str) -> IResult<&str, Lexeme> {
    map(
        alt((
            tag("=="),
            tag("="),
            recognize(tuple((
                optional_is,
                tag("equal"),
                opt(char('s')),
                before_space,
                optional_to,
            ))),
        )),
        |_| token(TokenKind::Eq, "=="),
    )(input)
}

fn not_equal(input: &str) -> IResult<&str, Lexeme> {
    map(
        alt((
            tag("!="),
            recognize(tuple((
                optional_is,
                tag("not"),
                separator,
                tag("equal"),
                opt(char('s')),
                word_end,
                optional_to,
            ))),
        )),
        |_| token(TokenKind::Ne, "!="),
    )(input)
}

fn operator(input: &str) -> IResult<&str, Lexeme> {
    map(
        alt((tag("+"), tag("-"), tag("*"), tag("/"), tag("<="), tag(">="))),
        |op| token(TokenKind::Operator, op),
    )(input)
}

/// `greater than`や`less then`
fn comparison_phrase<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    recognize(tuple((
        optional_is,
        tag(word),
        separator,
        tag("th"),
        one_of("ea"),
        tag("n"),
        word_end,
    )))
}

fn greater(input: &str) -> IResult<&str, Lexeme> {
    map(alt((tag(">"), comparison_phrase("greater"))), |_| {
        token(TokenKind::Gt, ">")
    })(input)
}

fn less(input: &str) -> IResult<&str, Lexeme> {
    map(alt((tag("<"), comparison_phrase("less"))), |_| {
        token(TokenKind::Lt, "<")
    })(input)
}

fn isnt(input: &str) -> IResult<&str, Lexeme> {
    map(
        alt((
            terminated(recognize(tuple((tag("is"), separator, tag("not")))), before_space),
            spaced("isnt"),
            spaced("not"),
        )),
        |_| token(TokenKind::Isnt, "isnot"),
    )(input)
}

fn whitespace(input: &str) -> IResult<&str, Lexeme> {
    map(take_while1(|c: char| c == ' ' || c == '\t'), Lexeme::Whitespace)(input)
}

fn continuation(input: &str) -> IResult<&str, Lexeme> {
    map(tuple((char('\\'), opt(char('\r')), char('\n'))), |_| {
        Lexeme::Continuation
    })(input)
}

fn newlines(input: &str) -> IResult<&str, Lexeme> {
    map(
        many1_count(preceded(opt(char('\r')), char('\n'))),
        Lexeme::Newlines,
    )(input)
}

fn else_if(input: &str) -> IResult<&str, Lexeme> {
    map(
        recognize(tuple((
            tag("else"),
            separator,
            alt((tag("if"), tag("unless"))),
            word_end,
        ))),
        |text| token(TokenKind::ElseIf, text),
    )(input)
}

fn if_unless(input: &str) -> IResult<&str, Lexeme> {
    map(
        terminated(alt((tag("if"), tag("unless"))), word_end),
        |text| token(TokenKind::If, text),
    )(input)
}

fn sort_by(input: &str) -> IResult<&str, Lexeme> {
    map(
        recognize(tuple((tag("sort"), separator, tag("by"), word_end))),
        |text| token(TokenKind::SortBy, text),
    )(input)
}

fn asc_desc(input: &str) -> IResult<&str, Lexeme> {
    map(alt((spaced("asc"), spaced("desc"))), |text| {
        token(TokenKind::AscDesc, text)
    })(input)
}

fn from(input: &str) -> IResult<&str, Lexeme> {
    map(alt((spaced("for"), spaced("from"))), |text| {
        token(TokenKind::From, text)
    })(input)
}

fn ni(input: &str) -> IResult<&str, Lexeme> {
    map(alt((spaced("at"), spaced("on"), spaced("in"))), |text| {
        token(TokenKind::Ni, text)
    })(input)
}

fn schedule(input: &str) -> IResult<&str, Lexeme> {
    map(
        alt((
            spaced("hourly"),
            spaced("daily"),
            spaced("weekly"),
            spaced("monthly"),
            spaced("quarterly"),
            spaced("yearly"),
            spaced("every"),
        )),
        |text| token(TokenKind::Schedule, text),
    )(input)
}

/// `.`・`_`で始まってもよい英字の並び。`-suffix`と数字が続いてもよい
fn name_segment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('.')),
        opt(char('_')),
        alpha1,
        opt(pair(char('-'), take_while1(is_word_char))),
        digit0,
    )))(input)
}

/// `['key']`・`["key"]`・`[0]`
fn bracket_segment(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('['),
        alt((
            recognize(delimited(char('\''), is_not("'"), char('\''))),
            recognize(delimited(char('"'), is_not("\""), char('"'))),
            digit1,
        )),
        char(']'),
    ))(input)
}

/// 末尾の添字・範囲 `[-1]`・`[1..3]`・`[2..]`
fn index_suffix(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        char('['),
        opt(char('-')),
        digit1,
        opt(tuple((tag(".."), opt(char('-')), digit0))),
        char(']'),
    )))(input)
}

/// 名前（パス）
pub fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        many1_count(alt((name_segment, bracket_segment))),
        opt(index_suffix),
    ))(input)
}

fn integer_part(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(one_of("123456789"), digit0)),
        tag("0"),
    ))(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

/// 数値リテラル（`$`接頭辞と`%`接尾辞を含む）
pub fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('$')),
        alt((
            recognize(tuple((char('0'), one_of("xX"), hex_digit1))),
            recognize(pair(char('0'), oct_digit1)),
            recognize(tuple((integer_part, char('.'), digit0, opt(exponent)))),
            recognize(tuple((char('.'), digit1, opt(exponent)))),
            recognize(pair(integer_part, opt(exponent))),
        )),
        opt(char('%')),
    )))(input)
}

fn comment(input: &str) -> IResult<&str, Lexeme> {
    map(preceded(char('#'), not_line_ending), |_| Lexeme::Skip)(input)
}

fn string_start(input: &str) -> IResult<&str, Lexeme> {
    alt((
        map(tag("'''"), |_| Lexeme::StringStart {
            quote: Quote::Single,
            triple: true,
        }),
        map(tag("\"\"\""), |_| Lexeme::StringStart {
            quote: Quote::Double,
            triple: true,
        }),
        map(char('\''), |_| Lexeme::StringStart {
            quote: Quote::Single,
            triple: false,
        }),
        map(char('"'), |_| Lexeme::StringStart {
            quote: Quote::Double,
            triple: false,
        }),
    ))(input)
}

fn punctuation(input: &str) -> IResult<&str, Lexeme> {
    alt((
        map(char('('), |_| token(TokenKind::LParen, "(")),
        map(char(')'), |_| token(TokenKind::RParen, ")")),
        map(char(','), |_| token(TokenKind::Comma, ",")),
    ))(input)
}

/// デフォルトモードで次の字句を1つ認識する
pub fn default_rule(input: &str) -> IResult<&str, Lexeme> {
    alt((
        alt((
            boolean, regex, number_of, kwarg, equal, not_equal, operator, greater, less, isnt,
        )),
        alt((whitespace, continuation, newlines)),
        alt((else_if, if_unless, sort_by, asc_desc, from, ni, schedule)),
        alt((
            map(name, Lexeme::Name),
            map(number, Lexeme::Number),
            comment,
        )),
        alt((string_start, punctuation)),
    ))(input)
}
