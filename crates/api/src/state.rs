//! Shared application state.

use domain::OrderDesk;
use projections::{OrderHistoryView, ProjectionProcessor, SalesView};
use store::RecordStore;
use tokio::sync::Mutex;

/// Shared application state accessible from all handlers.
///
/// The desk sits behind a single mutex, so each request's validate, decrement
/// and append steps never interleave with another request's.
pub struct AppState<B: RecordStore> {
    pub desk: Mutex<OrderDesk<B>>,
    pub processor: ProjectionProcessor,
    pub history: OrderHistoryView,
    pub sales: SalesView,
}

impl<B: RecordStore> AppState<B> {
    /// Wraps `desk`, registers the read models and replays the ledger into them.
    pub fn new(desk: OrderDesk<B>) -> projections::Result<Self> {
        let history = OrderHistoryView::new();
        let sales = SalesView::new();

        let mut processor = ProjectionProcessor::new();
        processor.register(Box::new(history.clone()));
        processor.register(Box::new(sales.clone()));
        processor.run_catch_up(&desk)?;

        Ok(Self {
            desk: Mutex::new(desk),
            processor,
            history,
            sales,
        })
    }
}
