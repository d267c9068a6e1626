//! storekeep CLI Client
//!
//! Sends one request to a worker, as the master would, and prints the reply.

use std::time::Duration;

use clap::{Parser, Subcommand};
use storekeep::catalog::{Product, Purchase, PurchaseLine, Store};
use storekeep::network::Client;
use storekeep::protocol::{
    AddStore, CategoryQuery, CustomerQuery, FetchProducts, FilterQuery, FindStore, GeoQuery,
    NewProduct, ProductRef, PurchaseOrder, QuantityChange, RateStore, Reply, Request,
};

/// storekeep CLI
#[derive(Parser, Debug)]
#[command(name = "storekeep-cli")]
#[command(about = "CLI for a storekeep catalog worker")]
struct Args {
    /// Worker address
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    server: String,

    /// Request id echoed back by roles that carry one
    #[arg(long, default_value = "cli")]
    request_id: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a store
    AddStore {
        name: String,
        latitude: f64,
        longitude: f64,
        category: String,
        #[arg(long, default_value = "0")]
        stars: f64,
        #[arg(long, default_value = "0")]
        reviews: u32,
        #[arg(long, default_value = "")]
        image: String,
    },

    /// Check whether a store exists
    FindStore { store: String },

    /// Check whether a product exists
    FindProduct {
        store: String,
        product: String,
        /// Report removed products as hidden
        #[arg(long)]
        hidden_aware: bool,
    },

    /// Add a product to a store
    NewProduct {
        store: String,
        name: String,
        category: String,
        price: f64,
        quantity: i32,
    },

    /// Add stock
    Increase { store: String, product: String, amount: u32 },

    /// Remove stock
    Decrease { store: String, product: String, amount: u32 },

    /// Take a product off sale
    Remove { store: String, product: String },

    /// Units sold per store of a store category
    SalesByStoreCategory { category: String },

    /// Units sold per store in a product category
    SalesByProductCategory { category: String },

    /// Stores within a radius
    GeoSearch { latitude: f64, longitude: f64, radius: f64 },

    /// Stores within a radius passing extra filters
    Filter {
        latitude: f64,
        longitude: f64,
        radius: f64,
        /// Accepted store category (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long, default_value = "0")]
        min_stars: f64,
        /// "$", "$$" or "$$$"
        #[arg(long, default_value = "")]
        price: String,
    },

    /// Products on sale at a store
    Products { store: String },

    /// Buy products, given as NAME=QUANTITY
    Buy {
        store: String,
        customer: String,
        #[arg(value_parser = parse_line)]
        items: Vec<PurchaseLine>,
    },

    /// Rate a store
    Rate { store: String, rating: i32 },

    /// What a customer bought at a store
    CustomerPurchases { customer: String, store: String },
}

fn parse_line(item: &str) -> Result<PurchaseLine, String> {
    let (name, quantity) = item
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=QUANTITY, got '{item}'"))?;
    let quantity = quantity
        .parse()
        .map_err(|e| format!("bad quantity in '{item}': {e}"))?;
    Ok(PurchaseLine::new(name, quantity))
}

fn build_request(command: Commands, request_id: String) -> Request {
    match command {
        Commands::AddStore { name, latitude, longitude, category, stars, reviews, image } => {
            let store = Store::new(name, latitude, longitude, category)
                .with_rating(stars, reviews)
                .with_image(image);
            Request::AddStore(AddStore { store })
        }
        Commands::FindStore { store } => Request::FindStore(FindStore { store_name: store }),
        Commands::FindProduct { store, product, hidden_aware } => {
            let body = ProductRef { store_name: store, product_name: product };
            if hidden_aware {
                Request::FindProductHiddenAware(body)
            } else {
                Request::FindProduct(body)
            }
        }
        Commands::NewProduct { store, name, category, price, quantity } => Request::NewProduct(NewProduct {
            store_name: store,
            product: Product::new(name, category, price, quantity),
        }),
        Commands::Increase { store, product, amount } => Request::IncreaseQuantity(QuantityChange {
            store_name: store,
            product_name: product,
            amount,
        }),
        Commands::Decrease { store, product, amount } => Request::DecreaseQuantity(QuantityChange {
            store_name: store,
            product_name: product,
            amount,
        }),
        Commands::Remove { store, product } => {
            Request::RemoveProduct(ProductRef { store_name: store, product_name: product })
        }
        Commands::SalesByStoreCategory { category } => Request::SalesByStoreCategory(CategoryQuery { category }),
        Commands::SalesByProductCategory { category } => {
            Request::SalesByProductCategory(CategoryQuery { category })
        }
        Commands::GeoSearch { latitude, longitude, radius } => Request::GeoSearch(GeoQuery {
            request_id,
            latitude,
            longitude,
            radius,
        }),
        Commands::Filter { latitude, longitude, radius, categories, min_stars, price } => {
            Request::FilteredSearch(FilterQuery {
                request_id,
                latitude,
                longitude,
                radius,
                categories,
                min_stars,
                price_category: price,
            })
        }
        Commands::Products { store } => Request::FetchProducts(FetchProducts { request_id, store_name: store }),
        Commands::Buy { store, customer, items } => Request::Purchase(PurchaseOrder {
            request_id,
            purchase: Purchase::new(customer, items),
            store_name: store,
        }),
        Commands::Rate { store, rating } => Request::Rate(RateStore { request_id, store_name: store, rating }),
        Commands::CustomerPurchases { customer, store } => {
            Request::CustomerPurchasesByStore(CustomerQuery { customer_name: customer, store_name: store })
        }
    }
}

fn print_reply(reply: &Reply) {
    match reply {
        Reply::AddStore(ack)
        | Reply::IncreaseQuantity(ack)
        | Reply::NewProduct(ack)
        | Reply::RemoveProduct(ack)
        | Reply::DecreaseQuantity(ack)
        | Reply::Rate { ack, .. } => println!("{ack}"),
        Reply::FindStore(found) => println!("{}", found.as_deref().unwrap_or("null")),
        Reply::FindProduct(presence) => println!("{presence}"),
        Reply::FindProductHiddenAware(lookup) => match lookup {
            Some(lookup) => println!("{lookup}"),
            None => println!("null"),
        },
        Reply::SalesByStoreCategory(totals)
        | Reply::SalesByProductCategory(totals)
        | Reply::CustomerPurchasesByStore(totals) => {
            for (name, units) in totals {
                println!("{name}\t{units}");
            }
        }
        Reply::GeoSearch { stores, .. } | Reply::FilteredSearch { stores, .. } => {
            for store in stores {
                println!(
                    "{}\t{}\t{:.1} stars\t{}",
                    store.name,
                    store.category,
                    store.stars,
                    store.price_category()
                );
            }
        }
        Reply::FetchProducts { products, .. } => {
            for product in products {
                println!("{}\t{}\t{:.2}\t{}", product.name, product.category, product.price, product.quantity);
            }
        }
        Reply::Purchase { outcome, .. } => println!("{outcome}"),
    }
}

fn main() {
    let args = Args::parse();
    let client = Client::new(args.server).with_timeout(Duration::from_secs(10));
    let request = build_request(args.command, args.request_id);

    match client.call(&request) {
        Ok(reply) => print_reply(&reply),
        Err(e) => {
            eprintln!("error from {}: {e}", client.addr());
            std::process::exit(1);
        }
    }
}
