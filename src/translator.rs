// BASIC line → C fragment translator
// Each call looks at exactly one line; nothing is remembered between calls.

use std::fmt;

/// The translated output for one source line, tagged by its role in the
/// assembled program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A function signature ending in an opening brace.
    FunctionOpen(String),
    /// Marker produced by `ENDFUNCTION`.
    FunctionClose,
    /// Any statement-level C text, possibly spanning several lines (`IF`).
    Statement(String),
    /// A diagnostic, rendered as a line comment.
    Comment(String),
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::FunctionOpen(text) | Fragment::Statement(text) => f.write_str(text),
            Fragment::FunctionClose => f.write_str("}"),
            Fragment::Comment(text) => write!(f, "// {}", text),
        }
    }
}

/// Why a line could not be translated into code. These never abort a
/// translation; they become comment fragments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Syntax error: LET without variable")]
    LetWithoutVariable,

    #[error("Syntax error: CHANGE without assignment")]
    ChangeWithoutAssignment,

    #[error("Syntax error: INPUT without variable")]
    InputWithoutVariable,

    #[error("Syntax error: FUNCTION without name")]
    FunctionWithoutName,

    #[error("Syntax error: FOR without parameters")]
    ForWithoutParameters,

    #[error("Syntax error: FOR without assignment")]
    ForWithoutAssignment,

    #[error("Syntax error: FOR without TO")]
    ForWithoutTo,

    #[error("Syntax error: FOR with empty STEP")]
    ForWithEmptyStep,

    #[error("Syntax error: CALL without function")]
    CallWithoutFunction,

    #[error("Syntax error: IF without condition")]
    IfWithoutCondition,

    #[error("Syntax error: IF without THEN")]
    IfWithoutThen,

    #[error("Error interpreting THEN clause: {0}")]
    ThenClause(String),

    #[error("Command not recognized: {0}")]
    Unrecognized(String),
}

/// The fixed command vocabulary. Matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Print,
    Let,
    Change,
    Input,
    Function,
    EndFunction,
    Return,
    For,
    Next,
    Call,
    If,
}

impl Command {
    const ALL: [(&'static str, Command); 11] = [
        ("PRINT", Command::Print),
        ("LET", Command::Let),
        ("CHANGE", Command::Change),
        ("INPUT", Command::Input),
        ("FUNCTION", Command::Function),
        ("ENDFUNCTION", Command::EndFunction),
        ("RETURN", Command::Return),
        ("FOR", Command::For),
        ("NEXT", Command::Next),
        ("CALL", Command::Call),
        ("IF", Command::If),
    ];

    pub fn lookup(token: &str) -> Option<Command> {
        Self::ALL
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, cmd)| *cmd)
    }
}

/// Keywords that keep a line containing `=` from being read as a bare
/// assignment.
const ASSIGNMENT_LEADERS: [&str; 3] = ["LET", "FUNCTION", "FOR"];

/// Translate one source line. Never fails: problems come back as
/// [`Fragment::Comment`].
pub fn translate(line: &str) -> Fragment {
    match translate_line(line.trim()) {
        Ok(fragment) => fragment,
        Err(err) => Fragment::Comment(err.to_string()),
    }
}

fn translate_line(line: &str) -> Result<Fragment, LineError> {
    let (head, args) = split_command(line).ok_or(LineError::EmptyCommand)?;

    if is_bare_assignment(line) {
        return Ok(Fragment::Statement(format!("{};", line)));
    }

    let command =
        Command::lookup(head).ok_or_else(|| LineError::Unrecognized(head.to_string()))?;

    match command {
        Command::Print => Ok(Fragment::Statement(print_call(args))),
        Command::Let => {
            let decl = args.ok_or(LineError::LetWithoutVariable)?;
            Ok(Fragment::Statement(format!("int {};", decl)))
        }
        Command::Change => {
            let assignment = args.ok_or(LineError::ChangeWithoutAssignment)?;
            Ok(Fragment::Statement(format!("{};", assignment)))
        }
        Command::Input => {
            let var = args.ok_or(LineError::InputWithoutVariable)?;
            Ok(Fragment::Statement(format!("scanf(\"%d\", &{});", var)))
        }
        Command::Function => {
            let signature = FunctionSignature::parse(args)?;
            Ok(Fragment::FunctionOpen(signature.to_string()))
        }
        Command::EndFunction => Ok(Fragment::FunctionClose),
        Command::Return => Ok(Fragment::Statement(match args {
            Some(value) => format!("return {};", value),
            None => "return;".to_string(),
        })),
        Command::For => {
            let header = ForHeader::parse(args)?;
            Ok(Fragment::Statement(header.to_string()))
        }
        Command::Next => Ok(Fragment::Statement("}".to_string())),
        Command::Call => {
            let call = args.ok_or(LineError::CallWithoutFunction)?;
            Ok(Fragment::Statement(format!("{};", call)))
        }
        Command::If => translate_if(args),
    }
}

/// Split a trimmed line into its command token and the (non-empty) rest.
fn split_command(line: &str) -> Option<(&str, Option<&str>)> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let head = parts.next().filter(|head| !head.is_empty())?;
    let args = parts
        .next()
        .map(str::trim_start)
        .filter(|args| !args.is_empty());
    Some((head, args))
}

fn is_bare_assignment(line: &str) -> bool {
    line.contains('=')
        && !ASSIGNMENT_LEADERS
            .iter()
            .any(|keyword| starts_with_keyword(line, keyword))
}

/// Case-insensitive prefix match that requires the keyword to end at
/// whitespace or end of text, so `FORM` is not `FOR`.
fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    match text.get(..keyword.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(keyword) => text[keyword.len()..]
            .chars()
            .next()
            .map_or(true, char::is_whitespace),
        _ => false,
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte offset of the first case-insensitive occurrence of `keyword` in
/// `text` that is not part of a longer identifier, so `STEP-1` and `)THEN`
/// match but `STOP` and `AUTHENTIC` do not.
fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    text.char_indices().map(|(i, _)| i).find(|&i| {
        let Some(candidate) = text.get(i..i + keyword.len()) else {
            return false;
        };
        candidate.eq_ignore_ascii_case(keyword)
            && !text[..i].chars().next_back().is_some_and(is_ident_char)
            && !text[i + keyword.len()..]
                .chars()
                .next()
                .is_some_and(is_ident_char)
    })
}

fn print_call(args: Option<&str>) -> String {
    match args {
        None => "printf(\"\\n\");".to_string(),
        Some(text) if text.starts_with('"') && text.ends_with('"') => {
            format!("printf(\"%s\\n\", {});", text)
        }
        Some(expr) => format!("printf(\"%d\\n\", {});", expr),
    }
}

/// `NAME(A, B)` from a `FUNCTION` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature<'a> {
    pub name: &'a str,
    pub params: Vec<&'a str>,
}

impl<'a> FunctionSignature<'a> {
    pub fn parse(args: Option<&'a str>) -> Result<Self, LineError> {
        let args = args.ok_or(LineError::FunctionWithoutName)?;
        let Some((name, rest)) = args.split_once('(') else {
            return Ok(FunctionSignature {
                name: args,
                params: Vec::new(),
            });
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(LineError::FunctionWithoutName);
        }

        let params = rest.split(')').next().unwrap_or_default();
        let params = params
            .split(',')
            .map(str::trim)
            .filter(|param| !param.is_empty())
            .collect();

        Ok(FunctionSignature { name, params })
    }
}

impl fmt::Display for FunctionSignature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(|param| format!("int {}", param))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "int {}({}) {{", self.name, params)
    }
}

/// `var = start TO end [STEP step]` from a `FOR` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForHeader<'a> {
    pub var: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub step: &'a str,
}

impl<'a> ForHeader<'a> {
    pub fn parse(args: Option<&'a str>) -> Result<Self, LineError> {
        let args = args.ok_or(LineError::ForWithoutParameters)?;
        let (var, rest) = args
            .split_once('=')
            .ok_or(LineError::ForWithoutAssignment)?;
        let rest = rest.trim();

        let to = find_keyword(rest, "TO").ok_or(LineError::ForWithoutTo)?;
        let start = rest[..to].trim();
        let tail = rest[to + "TO".len()..].trim();

        let (end, step) = match find_keyword(tail, "STEP") {
            Some(at) => {
                let step = tail[at + "STEP".len()..].trim();
                if step.is_empty() {
                    return Err(LineError::ForWithEmptyStep);
                }
                (tail[..at].trim(), step)
            }
            None => (tail, "1"),
        };

        Ok(ForHeader {
            var: var.trim(),
            start,
            end,
            step,
        })
    }

    /// Numeric step, read like C's `atoi`: unparsable text counts as 0.
    pub fn step_value(&self) -> i64 {
        let (sign, digits) = match self.step.as_bytes().first() {
            Some(b'-') => (-1, &self.step[1..]),
            Some(b'+') => (1, &self.step[1..]),
            _ => (1, self.step),
        };
        let len = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        digits[..len].parse::<i64>().map_or(0, |n| sign * n)
    }
}

impl fmt::Display for ForHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = self.step_value();
        let comparator = if step >= 0 { "<=" } else { ">=" };
        let increment = match step {
            1 => format!("{}++", self.var),
            -1 => format!("{}--", self.var),
            _ => format!("{} += {}", self.var, self.step),
        };
        write!(
            f,
            "for (int {var} = {start}; {var} {comparator} {end}; {increment}) {{",
            var = self.var,
            start = self.start,
            end = self.end,
        )
    }
}

/// `IF cond THEN clause`: the clause is translated as an independent line
/// and inlined as the single body statement.
fn translate_if(args: Option<&str>) -> Result<Fragment, LineError> {
    let args = args.ok_or(LineError::IfWithoutCondition)?;
    let then = find_keyword(args, "THEN").ok_or(LineError::IfWithoutThen)?;
    let condition = args[..then].trim();
    if condition.is_empty() {
        return Err(LineError::IfWithoutCondition);
    }

    let clause = args[then + "THEN".len()..].trim();
    let body = match translate(clause) {
        Fragment::Statement(text) => text,
        Fragment::Comment(reason) => return Err(LineError::ThenClause(reason)),
        Fragment::FunctionOpen(_) | Fragment::FunctionClose => {
            return Err(LineError::ThenClause(
                "function blocks cannot be conditional".to_string(),
            ))
        }
    };

    let body = body.trim();
    let body = body.strip_suffix(';').unwrap_or(body);
    Ok(Fragment::Statement(format!(
        "if ({}) {{\n    {};\n  }}",
        condition, body
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_prefix_is_word_bounded() {
        assert!(starts_with_keyword("FOR I = 1 TO 3", "FOR"));
        assert!(starts_with_keyword("for", "FOR"));
        assert!(!starts_with_keyword("FORM = 3", "FOR"));
        assert!(!starts_with_keyword("FO", "FOR"));
    }

    #[test]
    fn keyword_search_skips_embedded_words() {
        assert_eq!(find_keyword("TOP TO 5", "TO"), Some(4));
        assert_eq!(find_keyword("AUTHENTIC THEN X", "THEN"), Some(10));
        assert_eq!(find_keyword("1 to 5", "TO"), Some(2));
        assert_eq!(find_keyword("1 UNTO 5", "TO"), None);
        assert_eq!(find_keyword("1 STEP-1", "STEP"), Some(2));
        assert_eq!(find_keyword("(X>0)THEN PRINT X", "THEN"), Some(5));
        assert_eq!(find_keyword("A_TO B", "TO"), None);
    }

    #[test]
    fn split_command_separates_arguments() {
        assert_eq!(split_command("PRINT   X"), Some(("PRINT", Some("X"))));
        assert_eq!(split_command("NEXT"), Some(("NEXT", None)));
        assert_eq!(split_command(""), None);
    }

    #[test]
    fn function_signature_collects_params() {
        let sig = FunctionSignature::parse(Some("ADD( A , B ,)")).unwrap();
        assert_eq!(sig.name, "ADD");
        assert_eq!(sig.params, vec!["A", "B"]);

        let sig = FunctionSignature::parse(Some("MAIN")).unwrap();
        assert_eq!(sig.name, "MAIN");
        assert!(sig.params.is_empty());
    }

    #[test]
    fn function_signature_errors() {
        assert_eq!(
            FunctionSignature::parse(None),
            Err(LineError::FunctionWithoutName)
        );
        assert_eq!(
            FunctionSignature::parse(Some("(A)")),
            Err(LineError::FunctionWithoutName)
        );
    }

    #[test]
    fn for_header_fields() {
        let header = ForHeader::parse(Some("I = 10 TO 1 STEP -2")).unwrap();
        assert_eq!(
            header,
            ForHeader {
                var: "I",
                start: "10",
                end: "1",
                step: "-2",
            }
        );
        assert_eq!(header.step_value(), -2);
    }

    #[test]
    fn for_header_errors() {
        assert_eq!(ForHeader::parse(None), Err(LineError::ForWithoutParameters));
        assert_eq!(
            ForHeader::parse(Some("I 1 TO 3")),
            Err(LineError::ForWithoutAssignment)
        );
        assert_eq!(
            ForHeader::parse(Some("I = 1, 3")),
            Err(LineError::ForWithoutTo)
        );
        assert_eq!(
            ForHeader::parse(Some("I = 1 TO 3 STEP")),
            Err(LineError::ForWithEmptyStep)
        );
    }

    #[test]
    fn step_reads_like_atoi() {
        let step = |s| ForHeader {
            var: "I",
            start: "0",
            end: "9",
            step: s,
        }
        .step_value();
        assert_eq!(step("+3"), 3);
        assert_eq!(step("2x"), 2);
        assert_eq!(step("N"), 0);
        assert_eq!(step("-"), 0);
    }

    #[test]
    fn command_lookup_ignores_case() {
        assert_eq!(Command::lookup("endfunction"), Some(Command::EndFunction));
        assert_eq!(Command::lookup("Print"), Some(Command::Print));
        assert_eq!(Command::lookup("GOTO"), None);
    }
}
