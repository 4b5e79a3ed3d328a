#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate derivative;
#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate log;
extern crate num_bigint;
extern crate num_rational;
extern crate num_traits;
extern crate rsmt2;
extern crate serde;
extern crate serde_yaml;

pub mod analysis;
pub mod environment;
pub mod expr;
pub mod formula;
pub mod solver;

pub mod error {
    error_chain! {
        types {
            Error, ErrorKind, ResultExt, Result;
        }

        foreign_links {
            ParseBigIntError(::num_bigint::ParseBigIntError);
            ParseRatioError(::num_rational::ParseRatioError);
            RSmt2(::rsmt2::errors::Error);
            IOError(::std::io::Error);
            SerdeYAML(::serde_yaml::Error);
        }

        errors {
            Translation(m: String) {
                description("Formula could not be translated")
                display("Translation error: {}", m)
            }
            Engine(m: String) {
                description("An error in the solving engine")
                display("Engine error: {}", m)
            }
        }
    }
}
