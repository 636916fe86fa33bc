pub mod test_data_generator;
