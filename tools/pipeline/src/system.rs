//! Service graph construction and file-drain driver

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::rc::Rc;

use booking::{
    ExecutionToTradeBookingListener, Position, PositionService, PositionToRiskListener, Pv01,
    RiskService, TradeBookingConnector, TradeBookingError, TradeBookingService,
    TradeBookingToPositionListener,
};
use execution::{
    AlgoExecutionService, AlgoExecutionToExecutionListener, ExecutionOrder, ExecutionService,
    MarketDataToAlgoExecutionListener,
};
use historical::{HistoricalDataConnector, HistoricalDataListener, HistoricalDataService};
use inquiry::{Inquiry, InquiryConnector, InquiryError, InquiryService};
use market_data::{MarketDataConnector, MarketDataError, MarketDataService};
use pricing::{PricingConnector, PricingError, PricingService};
use streaming::{
    AlgoStreamingService, AlgoStreamingToStreamingListener, PriceStream,
    PricingToAlgoStreamingListener, StreamingService,
};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("pricing ingress failed: {0}")]
    Pricing(#[from] PricingError),

    #[error("market data ingress failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("trade ingress failed: {0}")]
    TradeBooking(#[from] TradeBookingError),

    #[error("inquiry ingress failed: {0}")]
    Inquiry(#[from] InquiryError),

    #[error("sink error: {0}")]
    Sink(#[from] historical::HistoricalError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Row counts observed while draining the four inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub prices: u64,
    pub order_books: u64,
    pub trades: u64,
    pub inquiries: u64,
}

/// The fully wired trading system.
///
/// Listener graph (leaves first):
///
/// ```text
/// pricing ──▶ algo streaming ──▶ streaming ──▶ streaming sink
/// market data ──▶ algo execution ──▶ execution ──▶ execution sink
///                                             └──▶ trade booking
/// trade booking ──▶ positions ──▶ risk ──▶ risk sink
///               (position sink on positions)
/// inquiries ──▶ inquiry sink
/// ```
pub struct TradingSystem {
    pub pricing: Rc<RefCell<PricingService>>,
    pub algo_streaming: Rc<RefCell<AlgoStreamingService>>,
    pub streaming: Rc<RefCell<StreamingService>>,
    pub market_data: Rc<RefCell<MarketDataService>>,
    pub algo_execution: Rc<RefCell<AlgoExecutionService>>,
    pub execution: Rc<RefCell<ExecutionService>>,
    pub trade_booking: Rc<RefCell<TradeBookingService>>,
    pub positions: Rc<RefCell<PositionService>>,
    pub risk: Rc<RefCell<RiskService>>,
    pub inquiries: Rc<RefCell<InquiryService>>,
    pub streaming_sink: Rc<RefCell<HistoricalDataService<PriceStream>>>,
    pub execution_sink: Rc<RefCell<HistoricalDataService<ExecutionOrder>>>,
    pub position_sink: Rc<RefCell<HistoricalDataService<Position>>>,
    pub risk_sink: Rc<RefCell<HistoricalDataService<Pv01>>>,
    pub inquiry_sink: Rc<RefCell<HistoricalDataService<Inquiry>>>,
}

impl TradingSystem {
    /// Build the service graph, opening one sink file per output under
    /// `sink_dir`.
    pub fn new(sink_dir: &Path) -> Result<Self, PipelineError> {
        std::fs::create_dir_all(sink_dir)?;
        let sink = |name: &str| -> Result<HistoricalDataConnector, PipelineError> {
            Ok(HistoricalDataConnector::to_path(sink_dir.join(name))?)
        };

        let system = Self {
            pricing: Rc::new(RefCell::new(PricingService::new())),
            algo_streaming: Rc::new(RefCell::new(AlgoStreamingService::new())),
            streaming: Rc::new(RefCell::new(StreamingService::new())),
            market_data: Rc::new(RefCell::new(MarketDataService::new())),
            algo_execution: Rc::new(RefCell::new(AlgoExecutionService::new())),
            execution: Rc::new(RefCell::new(ExecutionService::new())),
            trade_booking: Rc::new(RefCell::new(TradeBookingService::new())),
            positions: Rc::new(RefCell::new(PositionService::new())),
            risk: Rc::new(RefCell::new(RiskService::new())),
            inquiries: Rc::new(RefCell::new(InquiryService::new())),
            streaming_sink: Rc::new(RefCell::new(HistoricalDataService::new(sink(
                "streaming.txt",
            )?))),
            execution_sink: Rc::new(RefCell::new(HistoricalDataService::new(sink(
                "executions.txt",
            )?))),
            position_sink: Rc::new(RefCell::new(HistoricalDataService::new(sink(
                "positions.txt",
            )?))),
            risk_sink: Rc::new(RefCell::new(HistoricalDataService::new(sink("risk.txt")?))),
            inquiry_sink: Rc::new(RefCell::new(HistoricalDataService::new(sink(
                "allinquiries.txt",
            )?))),
        };
        system.wire();
        Ok(system)
    }

    fn wire(&self) {
        // prices → streams → sink
        self.pricing
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(PricingToAlgoStreamingListener::new(
                self.algo_streaming.clone(),
            ))));
        self.algo_streaming
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(
                AlgoStreamingToStreamingListener::new(self.streaming.clone()),
            )));
        self.streaming
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(HistoricalDataListener::new(
                self.streaming_sink.clone(),
            ))));

        // books → crossings → executions → sink and trade booking
        self.market_data
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(
                MarketDataToAlgoExecutionListener::new(self.algo_execution.clone()),
            )));
        self.algo_execution
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(
                AlgoExecutionToExecutionListener::new(self.execution.clone()),
            )));
        self.execution
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(HistoricalDataListener::new(
                self.execution_sink.clone(),
            ))));
        self.execution
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(ExecutionToTradeBookingListener::new(
                self.trade_booking.clone(),
            ))));

        // trades → positions → risk, with sinks on both
        self.trade_booking
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(TradeBookingToPositionListener::new(
                self.positions.clone(),
            ))));
        self.positions
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(HistoricalDataListener::new(
                self.position_sink.clone(),
            ))));
        self.positions
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(PositionToRiskListener::new(
                self.risk.clone(),
            ))));
        self.risk
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(HistoricalDataListener::new(
                self.risk_sink.clone(),
            ))));

        // completed inquiries → sink
        self.inquiries
            .borrow_mut()
            .add_listener(Rc::new(RefCell::new(HistoricalDataListener::new(
                self.inquiry_sink.clone(),
            ))));
    }

    /// Drain the four input files in order: prices, market data, trades,
    /// inquiries. Each file is read to EOF before the next is opened.
    pub fn run(&self, input_dir: &Path) -> Result<RunSummary, PipelineError> {
        let open = |name: &str| -> Result<BufReader<File>, PipelineError> {
            Ok(BufReader::new(File::open(input_dir.join(name))?))
        };
        let mut summary = RunSummary::default();

        let prices = PricingConnector::new(self.pricing.clone())
            .subscribe(open("prices.csv")?)?;
        summary.prices = prices.ingested;
        info!(rows = prices.ingested, skipped = prices.skipped, "prices drained");

        summary.order_books = MarketDataConnector::new(self.market_data.clone())
            .subscribe(open("marketdata.csv")?)?;
        info!(books = summary.order_books, "market data drained");

        summary.trades = TradeBookingConnector::new(self.trade_booking.clone())
            .subscribe(open("trades.csv")?)?;
        info!(trades = summary.trades, "trades drained");

        let inquiries = InquiryConnector::new(self.inquiries.clone())
            .subscribe(open("inquiries.csv")?)?;
        summary.inquiries = inquiries.ingested;
        info!(
            rows = inquiries.ingested,
            rejected = inquiries.rejected,
            "inquiries drained"
        );

        Ok(summary)
    }
}
