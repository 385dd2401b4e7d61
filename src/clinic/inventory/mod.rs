//! 库存模块：商品、服务、购物车、销售历史

pub mod api;
pub mod cart;
pub mod catalog;
pub mod crud;
pub mod form;
pub mod history;
pub mod models;
pub mod overview;

pub use api::InventoryApi;
pub use cart::{CartLine, SaleBuilder};
pub use catalog::{CatalogDraft, CatalogItem, Column};
pub use crud::CrudManager;
pub use form::ItemForm;
pub use history::{describe_sale_item, HistoryState, SalesHistory};
pub use models::{
    format_brl, ItemKind, NewSale, NewSaleItem, Product, ProductDraft, Sale, SaleItem, Service,
    ServiceDraft,
};
pub use overview::InventoryOverview;
