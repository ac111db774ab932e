mod offer;

pub use offer::{find_offer_by, NewOffer, Offer, OfferForm};
