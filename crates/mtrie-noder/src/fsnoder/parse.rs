use std::sync::Arc;

use crate::error::{NoderError, NoderResult};
use crate::fsnoder::{Dir, File};
use crate::noder::NoderRef;

const DIR_START: char = '(';
const DIR_END: char = ')';
const FILE_START: char = '<';
const FILE_END: char = '>';
const SEPARATOR: char = ' ';

/// Parse a tree written in the fsnoder notation into its root directory.
///
/// The input must be a single unnamed directory, e.g. `"(a<1> b(c<2>))"`.
pub fn parse(input: &str) -> NoderResult<NoderRef> {
    let mut parser = Parser {
        chars: input.chars().collect(),
        pos: 0,
    };
    let root = parser.node()?;
    if parser.pos != parser.chars.len() {
        return Err(parser.error("trailing input"));
    }
    if !root.is_dir() || !root.name().is_empty() {
        return Err(parser.error("root must be an unnamed directory"));
    }
    Ok(root)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn node(&mut self) -> NoderResult<NoderRef> {
        let name = self.name();
        match self.bump() {
            Some(DIR_START) => self.dir_body(name),
            Some(FILE_START) => self.file_body(name),
            _ => Err(self.error("expected '(' or '<'")),
        }
    }

    fn dir_body(&mut self, name: String) -> NoderResult<NoderRef> {
        let mut children = Vec::new();
        loop {
            match self.peek() {
                Some(DIR_END) => {
                    self.pos += 1;
                    break;
                }
                Some(SEPARATOR) if !children.is_empty() => {
                    self.pos += 1;
                }
                Some(_) if children.is_empty() => {}
                Some(_) => return Err(self.error("expected ' ' or ')'")),
                None => return Err(self.error("unterminated directory")),
            }
            children.push(self.node()?);
        }
        Ok(Arc::new(Dir::new(name, children)?))
    }

    fn file_body(&mut self, name: String) -> NoderResult<NoderRef> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == FILE_END {
                let contents: String = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                return Ok(Arc::new(File::new(name, contents)?));
            }
            self.pos += 1;
        }
        Err(self.error("unterminated file"))
    }

    fn name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, DIR_START | DIR_END | FILE_START | FILE_END | SEPARATOR) {
                break;
            }
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn error(&self, what: &str) -> NoderError {
        NoderError::Construction(format!("{what} at offset {}", self.pos))
    }
}
