pub mod test_qlearning;
