use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use cursor_pagination::{
    binder::PageRequestBinder, config::Config, context::PagingRequest, sort::SortSpecification,
};

use super::Location;

#[derive(Args)]
pub struct EncodeArgs {
    /// Collection URL; existing page, size and sort parameters are replaced
    #[arg(value_name = "URL")]
    url: String,

    /// Zero-based page index
    #[arg(long)]
    page: u64,

    /// Page size (defaults to the URL's size, then the configured default)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    size: Option<u32>,

    /// Sort order as property[,asc|desc]; repeatable (defaults to the URL's sort)
    #[arg(long, value_name = "PROPERTY,DIR")]
    sort: Vec<String>,
}

pub fn execute(config: &Config, args: EncodeArgs) -> Result<()> {
    let binder = PageRequestBinder::from_config(&config.paging)?;
    let location = Location::parse(&args.url);

    println!("{}", encode(&binder, &location, &args)?);
    Ok(())
}

fn encode(binder: &PageRequestBinder, location: &Location, args: &EncodeArgs) -> Result<String> {
    let current = binder
        .cursor_context(&location.target())
        .context("URL carries invalid paging parameters")?;

    let page_size = match args.size {
        Some(size) if size > binder.max_page_size() => {
            eprintln!(
                "{} size {} exceeds the maximum; using {}",
                "Warning:".yellow().bold(),
                size,
                binder.max_page_size()
            );
            binder.max_page_size()
        }
        Some(size) => size,
        None => current.page_size(),
    };

    let sort = if args.sort.is_empty() {
        current.sort().clone()
    } else {
        SortSpecification::parse(&args.sort).context("Invalid --sort")?
    };

    let request = PagingRequest::new(args.page, page_size, sort);

    Ok(match location {
        Location::Absolute(url) => {
            let mut url = url.clone();
            binder.enhance_url(&request, &mut url);
            url.to_string()
        }
        Location::Relative(target) => binder.enhance(&request, target).to_string(),
    })
}
