mod conversions;
mod responses;
