mod wire_tests;
