pub mod advice;

pub use advice::{
    ExtractActionItemsRequest, ExtractActionItemsResponse, InvestmentAdviceRequest,
    InvestmentAdviceResponse, NoteText,
};
