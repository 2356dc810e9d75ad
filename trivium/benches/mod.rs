#![feature(test)]
extern crate test;

cipher::stream_cipher_bench!(
    trivium::Trivium;
    trivium_bench1_16b 16;
    trivium_bench2_256b 256;
    trivium_bench3_1kib 1024;
    trivium_bench4_16kib 16384;
);

cipher::stream_cipher_bench!(
    trivium::Trivium32;
    trivium32_bench1_16b 16;
    trivium32_bench2_256b 256;
    trivium32_bench3_1kib 1024;
    trivium32_bench4_16kib 16384;
);
