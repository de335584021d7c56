use super::{HeaderField, InstanceError};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "./src/instance.pest"]
struct InstanceParser;

/// The content of an instance file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceFile {
    pub size: usize,
    pub target: i64,
    pub elements: Vec<i64>,
}

/// Parses the three line instance format: size, target, then at least `size` whitespace
/// separated elements. Extra elements and lines after the third are ignored.
pub fn parse(content: &str) -> Result<InstanceFile, InstanceError> {
    // the grammar accepts any text, so these errors are defensive
    let instance_file = InstanceParser::parse(Rule::instance_file, content)
        .map_err(|e| InstanceError::Syntax(e.to_string()))?
        .next()
        .ok_or_else(|| InstanceError::Syntax("empty parse tree".to_string()))?;

    let mut lines: Vec<Pair<Rule>> = instance_file
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::line)
        .collect();
    // a final newline terminates the last line, it does not start a new one
    if lines.last().is_some_and(|line| line.as_str().is_empty()) {
        lines.pop();
    }
    let mut lines = lines.into_iter();

    let size = parse_header(lines.next(), HeaderField::Size)?;
    let size = usize::try_from(size)
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| InstanceError::MalformedHeader {
            field: HeaderField::Size,
            content: size.to_string(),
        })?;
    let target = parse_header(lines.next(), HeaderField::Target)?;

    let elements = match lines.next() {
        Some(line) => parse_elements(line, size)?,
        None => return Err(InstanceError::TruncatedBody),
    };

    Ok(InstanceFile {
        size,
        target,
        elements,
    })
}

fn parse_header(line: Option<Pair<Rule>>, field: HeaderField) -> Result<i64, InstanceError> {
    let malformed = |content: &str| InstanceError::MalformedHeader {
        field,
        content: content.trim().to_string(),
    };

    let Some(line) = line else {
        return Err(malformed(""));
    };
    let line_string = line.as_str();
    let mut tokens = line.into_inner();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => token
            .as_str()
            .parse()
            .map_err(|_| malformed(line_string)),
        _ => Err(malformed(line_string)),
    }
}

fn parse_elements(line: Pair<Rule>, size: usize) -> Result<Vec<i64>, InstanceError> {
    let tokens: Vec<Pair<Rule>> = line.into_inner().collect();
    if tokens.len() < size {
        return Err(InstanceError::InsufficientElements {
            expected: size,
            found: tokens.len(),
        });
    }

    tokens
        .into_iter()
        .take(size)
        .enumerate()
        .map(|(index, token)| parse_element(index, token))
        .collect()
}

fn parse_element(index: usize, token: Pair<Rule>) -> Result<i64, InstanceError> {
    token.as_str().parse().map_err(|_| {
        let (line, column) = token.as_span().start_pos().line_col();
        InstanceError::MalformedElement {
            index,
            token: token.as_str().to_string(),
            line,
            column,
        }
    })
}
