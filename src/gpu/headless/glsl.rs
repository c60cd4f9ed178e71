//! A small GLSL ES front end for the headless context.
//!
//! It only understands enough of the language to accept the sketches' shaders
//! and to reject what a browser compiler would obviously reject: unbalanced
//! delimiters, junk at global scope, a missing `main`, qualifiers from the
//! wrong language version, and float declarations without a precision in
//! fragment shaders. Linking checks the varying/uniform interface between the
//! two stages. Diagnostics follow the `ERROR: 0:<line>: '<token>' : <message>`
//! layout that WebGL implementations print.

use crate::gpu::context::ShaderStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Version {
    Es100,
    Es300,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Variable {
    pub ty: String,
    pub name: String,
}

/// What a compiled stage exposes to the linker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Interface {
    pub version: Version,
    /// Vertex attributes, or fragment varyings.
    pub inputs: Vec<Variable>,
    /// Vertex varyings, or fragment color outputs.
    pub outputs: Vec<Variable>,
    pub uniforms: Vec<Variable>,
}

/// Names assigned locations when a program links, in location order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Linked {
    pub attributes: Vec<String>,
    pub uniforms: Vec<String>,
}

#[derive(Debug, Clone)]
struct Token {
    text: String,
    line: usize,
}

const TYPES: &[&str] = &[
    "void", "bool", "int", "uint", "float", "vec2", "vec3", "vec4", "bvec2", "bvec3", "bvec4",
    "ivec2", "ivec3", "ivec4", "uvec2", "uvec3", "uvec4", "mat2", "mat3", "mat4", "mat2x2",
    "mat2x3", "mat2x4", "mat3x2", "mat3x3", "mat3x4", "mat4x2", "mat4x3", "mat4x4", "sampler2D",
    "sampler3D", "samplerCube", "sampler2DArray", "sampler2DShadow",
];

const QUALIFIERS: &[&str] = &[
    "precision", "attribute", "varying", "uniform", "in", "out", "const", "highp", "mediump",
    "lowp", "flat", "smooth", "centroid", "invariant", "layout", "struct",
];

const FLOAT_TYPES: &[&str] = &[
    "float", "vec2", "vec3", "vec4", "mat2", "mat3", "mat4", "mat2x2", "mat2x3", "mat2x4",
    "mat3x2", "mat3x3", "mat3x4", "mat4x2", "mat4x3", "mat4x4",
];

const PRECISIONS: &[&str] = &["highp", "mediump", "lowp"];

fn error_at(line: usize, token: &str, message: &str) -> String {
    format!("ERROR: 0:{}: '{}' : {}\n", line, token, message)
}

/// Compiles one stage, returning its interface or the info log.
pub(crate) fn compile(stage: ShaderStage, source: &str) -> Result<Interface, String> {
    let stripped = strip_comments(source);
    let (version, body) = split_directives(&stripped)?;
    let tokens = tokenize(&body);

    check_delimiters(&tokens)?;

    let mut unit = Unit {
        stage,
        version,
        known_types: TYPES.iter().map(|t| t.to_string()).collect(),
        float_precision: false,
        interface: Interface {
            version,
            inputs: Vec::new(),
            outputs: Vec::new(),
            uniforms: Vec::new(),
        },
    };
    unit.walk(&tokens)?;
    Ok(unit.interface)
}

/// Links two compiled stages.
pub(crate) fn link(vertex: &Interface, fragment: &Interface) -> Result<Linked, String> {
    if vertex.version != fragment.version {
        return Err("ERROR: Versions of linked shaders have to match.\n".to_string());
    }

    let mut log = String::new();
    for input in &fragment.inputs {
        match vertex.outputs.iter().find(|out| out.name == input.name) {
            None => log.push_str(&format!(
                "ERROR: Fragment varying {} does not match any vertex varying\n",
                input.name
            )),
            Some(out) if out.ty != input.ty => log.push_str(&format!(
                "ERROR: Types for varying {} differ between vertex and fragment shaders\n",
                input.name
            )),
            Some(_) => {}
        }
    }

    let mut uniforms: Vec<String> = Vec::new();
    for uniform in vertex.uniforms.iter().chain(fragment.uniforms.iter()) {
        let conflict = vertex
            .uniforms
            .iter()
            .chain(fragment.uniforms.iter())
            .find(|other| other.name == uniform.name && other.ty != uniform.ty);
        if conflict.is_some() && !uniforms.contains(&uniform.name) {
            log.push_str(&format!(
                "ERROR: Types of uniform {} differ between vertex and fragment shaders\n",
                uniform.name
            ));
        }
        if !uniforms.contains(&uniform.name) {
            uniforms.push(uniform.name.clone());
        }
    }

    if !log.is_empty() {
        return Err(log);
    }

    Ok(Linked {
        attributes: vertex.inputs.iter().map(|v| v.name.clone()).collect(),
        uniforms,
    })
}

struct Unit {
    stage: ShaderStage,
    version: Version,
    known_types: Vec<String>,
    float_precision: bool,
    interface: Interface,
}

impl Unit {
    fn walk(&mut self, tokens: &[Token]) -> Result<(), String> {
        let mut depth = 0usize;
        let mut parens = 0usize;
        let mut global_start = true;
        let mut local_start = false;
        let mut statement = 0usize;
        let mut has_main = false;

        for (i, tok) in tokens.iter().enumerate() {
            let text = tok.text.as_str();

            if depth == 0 && parens == 0 && global_start {
                if text == ";" {
                    continue;
                }
                if !self.starts_declaration(text) {
                    return Err(error_at(tok.line, text, "syntax error"));
                }
                if text == "void"
                    && tokens.get(i + 1).is_some_and(|t| t.text == "main")
                    && tokens.get(i + 2).is_some_and(|t| t.text == "(")
                {
                    has_main = true;
                }
                if text == "struct" {
                    if let Some(name) = tokens.get(i + 1) {
                        self.known_types.push(name.text.clone());
                    }
                }
                global_start = false;
                statement = i;
            }

            if depth > 0 && parens == 0 && local_start {
                local_start = false;
                self.check_local_declaration(tokens, i)?;
            }

            self.check_builtin(tok)?;

            match text {
                "{" => {
                    depth += 1;
                    local_start = true;
                }
                "}" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        global_start = true;
                    } else {
                        local_start = true;
                    }
                }
                "(" => parens += 1,
                ")" => parens = parens.saturating_sub(1),
                ";" if parens == 0 => {
                    if depth == 0 {
                        self.declare(&tokens[statement..i])?;
                        global_start = true;
                    } else {
                        local_start = true;
                    }
                }
                _ => {}
            }
        }

        if !has_main {
            return Err("ERROR: Missing main()\n".to_string());
        }
        Ok(())
    }

    fn starts_declaration(&self, text: &str) -> bool {
        QUALIFIERS.contains(&text) || self.known_types.iter().any(|t| t == text)
    }

    fn check_builtin(&self, tok: &Token) -> Result<(), String> {
        let misplaced = match (self.stage, tok.text.as_str()) {
            (ShaderStage::Fragment, "gl_Position") => true,
            (ShaderStage::Vertex, "gl_FragColor" | "gl_FragCoord") => true,
            (ShaderStage::Fragment, "gl_FragColor") => self.version == Version::Es300,
            _ => false,
        };
        if misplaced {
            return Err(error_at(tok.line, &tok.text, "undeclared identifier"));
        }
        Ok(())
    }

    fn check_local_declaration(&self, tokens: &[Token], i: usize) -> Result<(), String> {
        if self.stage != ShaderStage::Fragment || self.float_precision {
            return Ok(());
        }
        let tok = &tokens[i];
        let is_declaration = FLOAT_TYPES.contains(&tok.text.as_str())
            && tokens
                .get(i + 1)
                .is_some_and(|next| is_identifier(&next.text));
        if is_declaration {
            return Err(error_at(tok.line, "", &format!("No precision specified for ({})", tok.text)));
        }
        Ok(())
    }

    fn declare(&mut self, statement: &[Token]) -> Result<(), String> {
        let Some(first) = statement.first() else {
            return Ok(());
        };

        if first.text == "precision" {
            if statement.get(2).is_some_and(|t| t.text == "float") {
                self.float_precision = true;
            }
            return Ok(());
        }

        let mut storage: Option<&Token> = None;
        let mut has_precision = false;
        let mut idx = 0;
        while idx < statement.len() {
            let tok = &statement[idx];
            match tok.text.as_str() {
                "layout" => {
                    idx += 1;
                    let mut nested = 0usize;
                    while idx < statement.len() {
                        match statement[idx].text.as_str() {
                            "(" => nested += 1,
                            ")" => {
                                nested = nested.saturating_sub(1);
                                if nested == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                        idx += 1;
                    }
                }
                "attribute" | "varying" | "uniform" | "in" | "out" | "const" => storage = Some(tok),
                p if PRECISIONS.contains(&p) => has_precision = true,
                "flat" | "smooth" | "centroid" | "invariant" => {}
                _ => break,
            }
            idx += 1;
        }

        let rest = &statement[idx.min(statement.len())..];
        if rest.is_empty() || rest.iter().any(|t| t.text == "(") || rest[0].text == "struct" {
            return Ok(());
        }

        if let Some(storage) = storage {
            self.check_storage(storage)?;
        }

        let ty = rest[0].text.clone();
        if self.stage == ShaderStage::Fragment
            && FLOAT_TYPES.contains(&ty.as_str())
            && !has_precision
            && !self.float_precision
        {
            return Err(error_at(rest[0].line, "", &format!("No precision specified for ({})", ty)));
        }

        let names = rest[1..]
            .split(|t| t.text == ",")
            .filter_map(|group| group.first())
            .filter(|t| is_identifier(&t.text));

        for name in names {
            let variable = Variable {
                ty: ty.clone(),
                name: name.text.clone(),
            };
            match storage.map(|s| s.text.as_str()) {
                Some("uniform") => self.interface.uniforms.push(variable),
                Some("attribute" | "in") => self.interface.inputs.push(variable),
                Some("varying") if self.stage == ShaderStage::Fragment => {
                    self.interface.inputs.push(variable)
                }
                Some("varying" | "out") => self.interface.outputs.push(variable),
                _ => {}
            }
        }
        Ok(())
    }

    fn check_storage(&self, storage: &Token) -> Result<(), String> {
        let text = storage.text.as_str();
        match (self.version, text) {
            (Version::Es300, "attribute" | "varying") => {
                Err(error_at(storage.line, text, "Illegal use of reserved word"))
            }
            (Version::Es100, "in" | "out") => Err(error_at(
                storage.line,
                text,
                "storage qualifier supported in GLSL ES 3.00 and above only",
            )),
            (Version::Es100, "attribute") if self.stage == ShaderStage::Fragment => Err(error_at(
                storage.line,
                text,
                "supported in vertex shaders only",
            )),
            _ => Ok(()),
        }
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Removes `//` and `/* */` comments, keeping newlines so line numbers hold.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Reads `#version` and blanks every preprocessor line.
fn split_directives(source: &str) -> Result<(Version, String), String> {
    let mut version = Version::Es100;
    let mut body = String::with_capacity(source.len());
    let mut seen_code = false;

    for (index, line) in source.lines().enumerate() {
        let number = index + 1;
        let trimmed = line.trim();
        if let Some(directive) = trimmed.strip_prefix('#') {
            let mut words = directive.split_whitespace();
            if words.next() == Some("version") {
                if seen_code || number != 1 {
                    return Err(error_at(number, "#version", "must occur first in shader"));
                }
                let parts: Vec<&str> = words.collect();
                version = match parts.as_slice() {
                    ["100"] => Version::Es100,
                    ["300", "es"] => Version::Es300,
                    other => {
                        let given = other.first().copied().unwrap_or("");
                        return Err(error_at(number, given, "version number not supported"));
                    }
                };
            }
            seen_code = true;
            body.push('\n');
            continue;
        }
        if !trimmed.is_empty() {
            seen_code = true;
        }
        body.push_str(line);
        body.push('\n');
    }

    Ok((version, body))
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            line += 1;
            i += 1;
        } else if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token {
                text: chars[start..i].iter().collect(),
                line,
            });
        } else if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())) {
            let start = i;
            while i < chars.len() {
                let d = chars[i];
                let exponent_sign = (d == '+' || d == '-') && matches!(chars[i - 1], 'e' | 'E');
                if d.is_ascii_alphanumeric() || d == '.' || exponent_sign {
                    i += 1;
                } else {
                    break;
                }
            }
            tokens.push(Token {
                text: chars[start..i].iter().collect(),
                line,
            });
        } else {
            tokens.push(Token {
                text: c.to_string(),
                line,
            });
            i += 1;
        }
    }
    tokens
}

fn check_delimiters(tokens: &[Token]) -> Result<(), String> {
    let mut stack: Vec<&Token> = Vec::new();
    for tok in tokens {
        match tok.text.as_str() {
            "(" | "[" | "{" => stack.push(tok),
            close @ (")" | "]" | "}") => {
                let expected = match close {
                    ")" => "(",
                    "]" => "[",
                    _ => "{",
                };
                match stack.pop() {
                    Some(open) if open.text == expected => {}
                    _ => return Err(error_at(tok.line, close, "syntax error")),
                }
            }
            _ => {}
        }
    }
    match stack.last() {
        Some(open) => Err(error_at(open.line, "", "syntax error, unexpected end of file")),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "glsl_tests.rs"]
mod tests;
