//! Structural GLSL checks for the software context.
//!
//! This is not a compiler. It strips comments and preprocessor lines,
//! checks delimiter balance, requires a `void main()` definition, and
//! parses top-level `in`/`out`/`uniform` (and legacy `attribute`/
//! `varying`) declarations into a [`StageInterface`]. Function bodies are
//! only checked for balance. Linking matches fragment inputs to vertex
//! outputs by name and type.

use std::fmt;

use crate::pipeline::backend::ShaderStage;

/// A declared interface variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub ty: String,
    pub name: String,
}

/// What one compiled stage reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageInterface {
    pub inputs: Vec<Variable>,
    pub outputs: Vec<Variable>,
    pub uniforms: Vec<Variable>,
}

/// The interface of a linked program. Attribute locations are indices
/// into `attributes`, assigned in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedInterface {
    pub attributes: Vec<Variable>,
    pub uniforms: Vec<Variable>,
}

/// A compile diagnostic, formatted like a GLES driver log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR: 0:{}: {}", self.line, self.message)
    }
}

fn line_at(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())].matches('\n').count() + 1
}

fn error_at(text: &str, offset: usize, message: impl Into<String>) -> ScanError {
    ScanError {
        line: line_at(text, offset),
        message: message.into(),
    }
}

/// Replaces comments and preprocessor lines with spaces, keeping
/// newlines so offsets map to source line numbers.
fn strip(source: &str) -> Result<String, ScanError> {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;
    let mut line_start = true;
    while i < bytes.len() {
        let rest = &source[i..];
        if line_start && rest.trim_start_matches([' ', '\t']).starts_with('#') {
            let end = rest.find('\n').unwrap_or(rest.len());
            out.extend(std::iter::repeat(' ').take(end));
            i += end;
            continue;
        }
        if rest.starts_with("//") {
            let end = rest.find('\n').unwrap_or(rest.len());
            out.extend(std::iter::repeat(' ').take(end));
            i += end;
            continue;
        }
        if rest.starts_with("/*") {
            let end = rest[2..]
                .find("*/")
                .map(|e| e + 4)
                .ok_or_else(|| error_at(source, i, "unterminated comment"))?;
            out.extend(rest[..end].chars().map(|c| if c == '\n' { '\n' } else { ' ' }));
            i += end;
            continue;
        }
        let c = rest.chars().next().unwrap_or(' ');
        out.push(c);
        line_start = c == '\n';
        i += c.len_utf8();
    }
    Ok(out)
}

fn check_balance(text: &str) -> Result<(), ScanError> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    for (offset, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => stack.push((c, offset)),
            ')' | ']' | '}' => {
                let open = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((o, _)) if o == open => {}
                    _ => return Err(error_at(text, offset, format!("syntax error: unexpected '{c}'"))),
                }
            }
            _ => {}
        }
    }
    match stack.pop() {
        Some((c, offset)) => Err(error_at(text, offset, format!("syntax error: unclosed '{c}'"))),
        None => Ok(()),
    }
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

enum Storage {
    In,
    Out,
    Uniform,
}

fn parse_declaration(
    stage: ShaderStage,
    statement: &str,
    text: &str,
    offset: usize,
    interface: &mut StageInterface,
) -> Result<(), ScanError> {
    let mut statement = statement.trim();
    if let Some(rest) = statement.strip_prefix("layout") {
        let close = rest
            .find(')')
            .ok_or_else(|| error_at(text, offset, "malformed layout qualifier"))?;
        statement = rest[close + 1..].trim();
    }

    let tokens: Vec<&str> = statement.split_whitespace().collect();
    let Some((&first, rest)) = tokens.split_first() else {
        return Err(error_at(text, offset, "syntax error: unexpected ';'"));
    };

    if first == "precision" {
        return match rest {
            [p, ty] if matches!(*p, "lowp" | "mediump" | "highp") && is_identifier(ty) => Ok(()),
            _ => Err(error_at(text, offset, "malformed precision statement")),
        };
    }
    if first == "const" {
        return Ok(());
    }

    let storage = match (first, stage) {
        ("in", _) => Storage::In,
        ("out", _) => Storage::Out,
        ("uniform", _) => Storage::Uniform,
        ("attribute", ShaderStage::Vertex) => Storage::In,
        ("varying", ShaderStage::Vertex) => Storage::Out,
        ("varying", ShaderStage::Fragment) => Storage::In,
        _ => {
            return Err(error_at(
                text,
                offset,
                format!("syntax error: unexpected '{first}' at global scope"),
            ))
        }
    };

    let rest: Vec<&str> = rest
        .iter()
        .copied()
        .filter(|t| !matches!(*t, "flat" | "smooth" | "lowp" | "mediump" | "highp"))
        .collect();
    let [ty, name] = rest.as_slice() else {
        return Err(error_at(text, offset, format!("malformed declaration '{statement}'")));
    };
    if !is_identifier(ty) || !is_identifier(name) {
        return Err(error_at(text, offset, format!("malformed declaration '{statement}'")));
    }

    let variable = Variable {
        ty: ty.to_string(),
        name: name.to_string(),
    };
    let list = match storage {
        Storage::In => &mut interface.inputs,
        Storage::Out => &mut interface.outputs,
        Storage::Uniform => &mut interface.uniforms,
    };
    if list.iter().any(|v| v.name == variable.name) {
        return Err(error_at(text, offset, format!("redefinition of '{}'", variable.name)));
    }
    list.push(variable);
    Ok(())
}

/// Checks a stage's source and extracts its interface.
pub fn scan(stage: ShaderStage, source: &str) -> Result<StageInterface, ScanError> {
    let text = strip(source)?;
    check_balance(&text)?;

    let mut interface = StageInterface::default();
    let mut has_main = false;
    let mut depth = 0usize;
    let mut pending = String::new();
    let mut pending_start = 0usize;

    for (offset, c) in text.char_indices() {
        if depth > 0 {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if depth == 0 {
                pending_start = offset + 1;
            }
            continue;
        }
        match c {
            ';' => {
                parse_declaration(stage, &pending, &text, pending_start, &mut interface)?;
                pending.clear();
                pending_start = offset + 1;
            }
            '{' => {
                let header: Vec<&str> = pending
                    .split(|ch: char| ch.is_whitespace() || ch == '(' || ch == ')')
                    .filter(|t| !t.is_empty())
                    .collect();
                if !pending.trim_end().ends_with(')') || header.len() < 2 {
                    return Err(error_at(&text, offset, "syntax error: unexpected '{'"));
                }
                if header == ["void", "main"] || header == ["void", "main", "void"] {
                    has_main = true;
                }
                pending.clear();
                depth = 1;
            }
            _ => {
                if pending.trim().is_empty() && !c.is_whitespace() {
                    pending_start = offset;
                }
                pending.push(c);
            }
        }
    }

    if !pending.trim().is_empty() {
        return Err(error_at(&text, pending_start, "syntax error: expected ';'"));
    }
    if !has_main {
        return Err(error_at(&text, text.len(), "missing function: main"));
    }
    Ok(interface)
}

/// Links a vertex and fragment interface.
pub fn link(vertex: &StageInterface, fragment: &StageInterface) -> Result<LinkedInterface, String> {
    for input in &fragment.inputs {
        match vertex.outputs.iter().find(|o| o.name == input.name) {
            None => {
                return Err(format!(
                    "fragment input '{}' is not written by the vertex stage",
                    input.name
                ))
            }
            Some(output) if output.ty != input.ty => {
                return Err(format!(
                    "type mismatch for '{}': vertex writes {}, fragment reads {}",
                    input.name, output.ty, input.ty
                ))
            }
            Some(_) => {}
        }
    }

    let mut uniforms = vertex.uniforms.clone();
    for uniform in &fragment.uniforms {
        match uniforms.iter().find(|u| u.name == uniform.name) {
            Some(existing) if existing.ty != uniform.ty => {
                return Err(format!(
                    "uniform '{}' declared as {} and {}",
                    uniform.name, existing.ty, uniform.ty
                ))
            }
            Some(_) => {}
            None => uniforms.push(uniform.clone()),
        }
    }

    Ok(LinkedInterface {
        attributes: vertex.inputs.clone(),
        uniforms,
    })
}
