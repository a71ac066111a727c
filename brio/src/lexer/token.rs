//! Token definitions

use logos::Logos;

/// Brio Token
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // Keywords
    #[token("loop")]
    Loop,
    #[token("break_ifz")]
    BreakIfz,
    #[token("print")]
    Print,

    // Operators and punctuation
    #[token(":=")]
    ColonEq,
    #[token(":")]
    Colon,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semi,

    // Literals and identifiers
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    IntLit(i64),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Loop => write!(f, "loop"),
            Token::BreakIfz => write!(f, "break_ifz"),
            Token::Print => write!(f, "print"),
            Token::ColonEq => write!(f, ":="),
            Token::Colon => write!(f, ":"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semi => write!(f, ";"),
            Token::IntLit(n) => write!(f, "{n}"),
            Token::Ident(s) => write!(f, "{s}"),
        }
    }
}
