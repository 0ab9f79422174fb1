mod test_relay;
