//! Transparent cross-page row streaming.
//!
//! Manual paging lives on [`QueryResult`](crate::response::QueryResult):
//! take the token, install it, execute again. The stream here automates
//! that pull loop: it fetches a page, yields its rows one by one, and only
//! touches the engine again when the rows run out. A fetch error ends the
//! stream; the page sequence is not restartable mid-way (re-execute with
//! the last token for that).

use std::pin::Pin;
use std::task::{Context, Poll};

use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use tracing::trace;

use cassia_cql::deserialize::DecodeMode;

use crate::engine::{DriverEngine, EncodedStatement};
use crate::errors::ExecutionError;
use crate::response::query_result::{QueryResult, Row};

struct PagerState {
    engine: Arc<dyn DriverEngine>,
    statement: EncodedStatement,
    mode: DecodeMode,
    exhausted: bool,
    pages_fetched: usize,
}

pub(crate) fn row_stream(
    engine: Arc<dyn DriverEngine>,
    statement: EncodedStatement,
    mode: DecodeMode,
) -> RowStream {
    let state = PagerState {
        engine,
        statement,
        mode,
        exhausted: false,
        pages_fetched: 0,
    };
    let pages = stream::try_unfold(state, |mut state| async move {
        if state.exhausted {
            return Ok(None);
        }
        let raw = state.engine.execute(state.statement.clone()).await?;
        state.pages_fetched += 1;
        let token = raw.paging_state.clone();
        state.exhausted = !token.as_ref().is_some_and(|t| !t.is_empty());
        state.statement.paging_state = token;
        trace!(
            page = state.pages_fetched,
            rows = raw.rows.len(),
            exhausted = state.exhausted,
            "fetched result page"
        );
        let rows = QueryResult::new(raw, state.mode).rows()?;
        Ok::<_, ExecutionError>(Some((rows, state)))
    });
    let rows = pages
        .map_ok(|rows| stream::iter(rows.into_iter().map(Ok)))
        .try_flatten();
    RowStream {
        inner: rows.boxed(),
    }
}

/// A `futures::Stream` of decoded rows spanning all pages of a statement.
pub struct RowStream {
    inner: Pin<Box<dyn Stream<Item = Result<Row, ExecutionError>> + Send>>,
}

impl Stream for RowStream {
    type Item = Result<Row, ExecutionError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for RowStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStream").finish_non_exhaustive()
    }
}
