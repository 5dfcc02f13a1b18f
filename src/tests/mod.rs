mod dice;
mod parse;
mod roll;
