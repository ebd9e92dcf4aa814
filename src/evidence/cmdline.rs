// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Kernel command line tokens

use serde::{Deserialize, Serialize};

/// Key of the datasource override token
pub const DS_KEY: &str = "ds";

/// Kernel command line split into tokens, in boot order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KernelCmdline(Vec<String>);

impl KernelCmdline {
    /// Tokenize a raw command line.
    ///
    /// Whitespace separates tokens; double quotes group text that contains
    /// whitespace and are removed, as the kernel does for `foo="a b"`.
    /// Single quotes are ordinary characters.
    pub fn parse(raw: &str) -> Self {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut in_token = false;

        for c in raw.chars() {
            match (quoted, c) {
                (true, '"') => quoted = false,
                (true, _) => current.push(c),
                (false, '"') => {
                    quoted = true;
                    in_token = true;
                }
                (false, c) if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                (false, c) => {
                    current.push(c);
                    in_token = true;
                }
            }
        }
        if in_token {
            tokens.push(current);
        }

        Self(tokens)
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values of every `key=value` token with the given key, in order
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0.iter().filter_map(move |token| {
            token
                .split_once('=')
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v)
        })
    }

    /// Datasource names named by `ds=` tokens, in order.
    ///
    /// Parameters after `;` (as in `ds=NoCloud;s=http://10.0.0.1/`) are not
    /// part of the name.
    pub fn datasource_overrides(&self) -> Vec<&str> {
        self.values(DS_KEY)
            .map(|value| value.split(';').next().unwrap_or(value))
            .collect()
    }
}
