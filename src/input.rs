// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use futures_util::StreamExt as _;
use tokio::io;
use tokio_util::codec::{FramedRead, LinesCodec};

use crate::error::Result;

const MAX_LINE_LENGTH: usize = 4096;

/// A source of typed lines. `None` means the user closed the input.
#[async_trait]
pub(crate) trait Input: Send + Sync {
    async fn read_line(&mut self) -> Result<Option<String>>;
}

pub(crate) struct Stdin {
    lines: FramedRead<io::Stdin, LinesCodec>,
}

impl Stdin {
    pub(crate) fn new() -> Self {
        Self {
            lines: FramedRead::new(
                io::stdin(),
                LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
            ),
        }
    }
}

#[async_trait]
impl Input for Stdin {
    async fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next().await.transpose()?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::*;

    pub(crate) struct ScriptedInput {
        lines: VecDeque<String>,
    }

    impl ScriptedInput {
        pub(crate) fn new<I: IntoIterator<Item = &'static str>>(lines: I) -> Self {
            Self {
                lines: lines.into_iter().map(str::to_owned).collect(),
            }
        }
    }

    #[async_trait]
    impl Input for ScriptedInput {
        async fn read_line(&mut self) -> Result<Option<String>> {
            Ok(self.lines.pop_front())
        }
    }
}
