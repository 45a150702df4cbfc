pub mod collection_box;
pub mod kit_collection;
pub mod collection_list;
