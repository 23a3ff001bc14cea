use anyhow::Result;
use clap::Args;
use colored::Colorize;
use cursor_pagination::{binder::PageRequestBinder, config::Config, context::PagingRequest};
use serde::Serialize;

use super::Location;

#[derive(Args)]
pub struct DecodeArgs {
    /// URL as a client would request it
    #[arg(value_name = "URL")]
    url: String,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

/// What a URL resolves to
#[derive(Debug, Serialize, PartialEq, Eq)]
struct Decoded {
    page_index: u64,
    page_size: u32,
    offset: u64,
    sort: Vec<String>,
}

impl From<&PagingRequest> for Decoded {
    fn from(request: &PagingRequest) -> Self {
        Self {
            page_index: request.page_index(),
            page_size: request.page_size(),
            offset: request.offset(),
            sort: request.sort().to_query_values().collect(),
        }
    }
}

pub fn execute(config: &Config, args: DecodeArgs) -> Result<()> {
    let binder = PageRequestBinder::from_config(&config.paging)?;
    let decoded = decode(&binder, &args.url)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
    } else {
        println!("{:<11}{}", "page".bold(), decoded.page_index);
        println!("{:<11}{}", "size".bold(), decoded.page_size);
        println!("{:<11}{}", "offset".bold(), decoded.offset);
        let sort = if decoded.sort.is_empty() {
            "unsorted".dimmed().to_string()
        } else {
            decoded.sort.join(" ")
        };
        println!("{:<11}{}", "sort".bold(), sort);
    }

    Ok(())
}

fn decode(binder: &PageRequestBinder, url: &str) -> Result<Decoded> {
    let request = binder.resolve(&Location::parse(url).target())?;
    Ok(Decoded::from(&request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursor_pagination::codec::SimplePageCodec;
    use cursor_pagination::error::PaginationError;

    #[test]
    fn test_decode_page_number() {
        let binder = PageRequestBinder::new(SimplePageCodec);
        let decoded = decode(&binder, "http://localhost/items?page=3&size=10&sort=id,desc").unwrap();
        assert_eq!(
            decoded,
            Decoded {
                page_index: 3,
                page_size: 10,
                offset: 30,
                sort: vec!["id,desc".to_string()],
            }
        );
    }

    #[test]
    fn test_decode_first_page() {
        let binder = PageRequestBinder::default();
        let decoded = decode(&binder, "/items").unwrap();
        assert_eq!(decoded.page_index, 0);
        assert_eq!(decoded.page_size, 20);
        assert!(decoded.sort.is_empty());
    }

    #[test]
    fn test_decode_error_keeps_pagination_error() {
        let binder = PageRequestBinder::default();
        let err = decode(&binder, "/items?page=not-a-cursor").unwrap_err();
        let pagination = err.downcast_ref::<PaginationError>().unwrap();
        assert!(pagination.is_integrity_failure());
        assert!(err.chain().count() >= 2);
    }
}
